// Search session lifecycle state machine with validation

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Phase of the controller's single search session
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Idle,
    Submitting,
    Polling,
    Completed,
    Failed,
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionPhase::Idle => write!(f, "idle"),
            SessionPhase::Submitting => write!(f, "submitting"),
            SessionPhase::Polling => write!(f, "polling"),
            SessionPhase::Completed => write!(f, "completed"),
            SessionPhase::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StateTransitionError {
    #[error("Invalid session transition from {from:?} to {to:?}")]
    InvalidTransition { from: SessionPhase, to: SessionPhase },
}

/// Validates if a session can move from one phase to another
pub fn can_transition(from: SessionPhase, to: SessionPhase) -> bool {
    match (from, to) {
        // Any phase can start a new search; a running one is superseded
        (_, SessionPhase::Submitting) => true,

        // From Submitting
        (SessionPhase::Submitting, SessionPhase::Polling) => true,

        // From Polling
        (SessionPhase::Polling, SessionPhase::Completed) => true,
        (SessionPhase::Polling, SessionPhase::Failed) => true,
        (SessionPhase::Polling, SessionPhase::Polling) => true,

        // Submission failure and teardown land in Idle
        (_, SessionPhase::Idle) => true,

        _ => false,
    }
}

/// Validates and performs a phase transition
pub fn transition_state(
    current: SessionPhase,
    target: SessionPhase,
) -> Result<SessionPhase, StateTransitionError> {
    if !can_transition(current, target) {
        return Err(StateTransitionError::InvalidTransition {
            from: current,
            to: target,
        });
    }

    Ok(target)
}

/// Check if a phase has work outstanding against the backend
pub fn is_active_state(phase: SessionPhase) -> bool {
    matches!(phase, SessionPhase::Submitting | SessionPhase::Polling)
}

//! Search session controller
//!
//! [`SearchSessionController`] owns one search session at a time and drives it
//! through `Idle -> Submitting -> Polling -> Completed | Failed` against a
//! [`SearchBackend`], reporting every change to a [`Presenter`].
//!
//! All session state sits behind one mutex. The mutex is never held across an
//! await, and presenter calls are made while it is held, so a terminal
//! transition is presented exactly once and in order. Every search gets a new
//! generation number; responses that arrive for an older generation are
//! dropped.

mod error;
mod poller;

pub use error::SearchError;
pub use poller::PollTask;

use crate::client::{BackendError, SearchBackend};
use crate::models::state_machine::{is_active_state, transition_state};
use crate::models::{JobStatus, SearchStatus, SessionPhase};
use crate::presentation::{
    Presenter, PROGRESS_INITIAL_MESSAGE, TRIGGER_BUSY_LABEL, TRIGGER_IDLE_LABEL,
};
use crate::render::{build_view, ResultsView};
use crate::utils::lock_mutex_recover;
use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;
use tokio::sync::watch;

/// Interval between status checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

#[derive(Default)]
struct SessionState {
    search_id: Option<String>,
    generation: u64,
    poll: Option<PollTask>,
    phase: SessionPhase,
}

impl SessionState {
    fn stop_polling(&mut self) {
        if let Some(mut poll) = self.poll.take() {
            poll.cancel();
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation == generation && self.search_id.is_some()
    }
}

struct Inner<B, P> {
    backend: B,
    presenter: P,
    poll_interval: Duration,
    state: Mutex<SessionState>,
    phase_tx: watch::Sender<SessionPhase>,
}

impl<B: SearchBackend, P: Presenter> Inner<B, P> {
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        lock_mutex_recover(&self.state)
    }

    fn set_phase(&self, state: &mut SessionState, target: SessionPhase) {
        match transition_state(state.phase, target) {
            Ok(phase) => {
                log::debug!("Search session {} -> {}", state.phase, phase);
                state.phase = phase;
                self.phase_tx.send_replace(phase);
            }
            Err(e) => log::warn!("{}", e),
        }
    }

    fn reset_controls(&self) {
        self.presenter.set_trigger(true, TRIGGER_IDLE_LABEL);
        self.presenter.set_progress_visible(false);
    }

    /// Stop the timer and drop the session; returns whether one was active
    fn forget(&self, state: &mut SessionState) -> bool {
        if let Some(search_id) = &state.search_id {
            log::info!("Tearing down search {}", search_id);
        }
        state.stop_polling();
        state.search_id = None;
        state.generation += 1;

        let was_active = is_active_state(state.phase);
        if was_active {
            self.set_phase(state, SessionPhase::Idle);
        }
        was_active
    }

    /// End the polling session: stop the timer, forget the id, show `view`
    fn conclude(&self, state: &mut SessionState, phase: SessionPhase, view: &ResultsView) {
        state.search_id = None;
        state.stop_polling();
        self.set_phase(state, phase);
        self.presenter.show_results(view);
        self.reset_controls();
    }

    async fn poll_once(&self, generation: u64) -> ControlFlow<()> {
        let search_id = {
            let state = self.lock();
            match &state.search_id {
                Some(id) if state.generation == generation => id.clone(),
                _ => return ControlFlow::Break(()),
            }
        };

        log::debug!("Checking status of search {}", search_id);
        match self.backend.fetch_status(&search_id).await {
            Ok(status) => self.apply_status(generation, &search_id, status),
            Err(e) => {
                self.fail_polling(generation, &search_id, e);
                ControlFlow::Break(())
            }
        }
    }

    fn apply_status(
        &self,
        generation: u64,
        search_id: &str,
        status: SearchStatus,
    ) -> ControlFlow<()> {
        let mut state = self.lock();
        if !state.is_current(generation) {
            log::debug!("Ignoring status for superseded search {}", search_id);
            return ControlFlow::Break(());
        }

        self.presenter
            .set_progress(status.progress_percent(), status.progress_message());

        match status.status {
            JobStatus::Completed => {
                log::info!(
                    "Search {} completed with {} result(s)",
                    search_id,
                    status.results.len()
                );
                self.conclude(&mut state, SessionPhase::Completed, &build_view(&status));
                ControlFlow::Break(())
            }
            JobStatus::Error => {
                let error =
                    SearchError::RemoteJob(status.error.clone().filter(|e| !e.is_empty()));
                log::warn!("Search {} failed on the backend: {}", search_id, error);
                self.conclude(
                    &mut state,
                    SessionPhase::Failed,
                    &ResultsView::error(error.to_string()),
                );
                ControlFlow::Break(())
            }
            _ => ControlFlow::Continue(()),
        }
    }

    fn fail_polling(&self, generation: u64, search_id: &str, cause: BackendError) {
        let error = match cause {
            BackendError::Remote(message) => {
                log::warn!("Search {} rejected by the backend: {}", search_id, message);
                SearchError::RemoteJob(Some(message))
            }
            other => {
                log::error!("Error checking search status for {}: {}", search_id, other);
                SearchError::PollTransport(other.to_string())
            }
        };

        let mut state = self.lock();
        if !state.is_current(generation) {
            log::debug!("Ignoring failure for superseded search {}", search_id);
            return;
        }
        self.conclude(
            &mut state,
            SessionPhase::Failed,
            &ResultsView::error(error.to_string()),
        );
    }
}

/// Drives one search session at a time against a backend.
///
/// Cloning yields another handle to the same session.
pub struct SearchSessionController<B, P> {
    inner: Arc<Inner<B, P>>,
}

impl<B, P> Clone for SearchSessionController<B, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: SearchBackend, P: Presenter> SearchSessionController<B, P> {
    pub fn new(backend: B, presenter: P) -> Self {
        Self::with_poll_interval(backend, presenter, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_poll_interval(backend: B, presenter: P, poll_interval: Duration) -> Self {
        let (phase_tx, _) = watch::channel(SessionPhase::Idle);
        Self {
            inner: Arc::new(Inner {
                backend,
                presenter,
                poll_interval,
                state: Mutex::new(SessionState::default()),
                phase_tx,
            }),
        }
    }

    pub fn backend(&self) -> &B {
        &self.inner.backend
    }

    pub fn presenter(&self) -> &P {
        &self.inner.presenter
    }

    pub fn poll_interval(&self) -> Duration {
        self.inner.poll_interval
    }

    pub fn phase(&self) -> SessionPhase {
        self.inner.lock().phase
    }

    /// Id of the session being polled, if any
    pub fn search_id(&self) -> Option<String> {
        self.inner.lock().search_id.clone()
    }

    /// Whether a poll timer is currently armed
    pub fn has_active_poll(&self) -> bool {
        self.inner
            .lock()
            .poll
            .as_ref()
            .map(|poll| !poll.is_cancelled() && !poll.is_finished())
            .unwrap_or(false)
    }

    /// Watch phase changes
    pub fn subscribe(&self) -> watch::Receiver<SessionPhase> {
        self.inner.phase_tx.subscribe()
    }

    /// Wait until no search is submitting or polling and return the phase
    pub async fn wait_until_settled(&self) -> SessionPhase {
        let mut rx = self.subscribe();
        loop {
            let phase = *rx.borrow_and_update();
            if !is_active_state(phase) {
                return phase;
            }
            if rx.changed().await.is_err() {
                return phase;
            }
        }
    }

    /// Validate the form, submit a search and start polling it.
    ///
    /// Returns the backend's session id once polling has started. Any search
    /// already running is superseded first. Errors have already been shown
    /// through the presenter when this returns.
    pub async fn start_search(&self) -> Result<String, SearchError> {
        let inner = &self.inner;

        let request = {
            let state = inner.lock();
            match inner.presenter.read_form().validate() {
                Ok(request) => request,
                Err(e) => {
                    log::debug!("Search form rejected in phase {}: {}", state.phase, e);
                    inner.presenter.show_results(&ResultsView::error(e.to_string()));
                    return Err(e.into());
                }
            }
        };

        let generation = {
            let mut state = inner.lock();
            if let Some(previous) = &state.search_id {
                log::info!("Superseding search {}", previous);
            }
            state.stop_polling();
            state.search_id = None;
            state.generation += 1;
            inner.set_phase(&mut state, SessionPhase::Submitting);

            inner.presenter.set_trigger(false, TRIGGER_BUSY_LABEL);
            inner.presenter.set_progress_visible(true);
            inner.presenter.set_progress(0.0, PROGRESS_INITIAL_MESSAGE);
            inner.presenter.show_results(&ResultsView::idle());
            state.generation
        };

        log::info!(
            "Submitting search for '{}' on {}",
            request.part_number,
            request
                .websites
                .iter()
                .map(|w| w.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        let outcome = inner.backend.create_search(&request).await;

        let mut state = inner.lock();
        if state.generation != generation {
            log::debug!("Dropping create response for superseded search");
            return Err(SearchError::Superseded);
        }

        match outcome {
            Ok(search_id) => {
                log::info!(
                    "Search {} started, polling every {:?}",
                    search_id,
                    inner.poll_interval
                );
                state.search_id = Some(search_id.clone());
                inner.set_phase(&mut state, SessionPhase::Polling);

                let weak: Weak<Inner<B, P>> = Arc::downgrade(inner);
                state.poll = Some(PollTask::spawn(inner.poll_interval, move || {
                    let weak = weak.clone();
                    async move {
                        match weak.upgrade() {
                            Some(inner) => inner.poll_once(generation).await,
                            None => ControlFlow::Break(()),
                        }
                    }
                }));
                Ok(search_id)
            }
            Err(e) => {
                let error = SearchError::Submission(e.to_string());
                log::warn!("{}", error);
                inner.set_phase(&mut state, SessionPhase::Idle);
                inner.presenter.show_results(&ResultsView::error(error.to_string()));
                inner.reset_controls();
                Err(error)
            }
        }
    }

    /// Reset the results area to the idle prompt
    pub fn clear_results(&self) {
        let _state = self.inner.lock();
        self.inner.presenter.show_results(&ResultsView::idle());
    }

    /// Cancel the poll timer and forget the session.
    ///
    /// Responses still in flight are ignored when they arrive. No presenter
    /// calls are made.
    pub fn teardown(&self) {
        let mut state = self.inner.lock();
        self.inner.forget(&mut state);
    }

    /// Stop a running search on the user's request.
    ///
    /// Same as [`Self::teardown`], but when a search was submitting or
    /// polling the trigger is re-enabled and progress hidden.
    pub fn cancel(&self) {
        let mut state = self.inner.lock();
        if self.inner.forget(&mut state) {
            self.inner.reset_controls();
        }
    }
}

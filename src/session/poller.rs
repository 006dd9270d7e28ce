// Cancellable periodic task: fire now, then once per period

use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Handle to a running poll loop.
///
/// The tick closure runs immediately and then every `period`; each tick is
/// awaited before the next one is scheduled, so ticks never overlap. The loop
/// ends when a tick returns `ControlFlow::Break`, or when the handle is
/// cancelled or dropped. Cancelling also drops a tick that is in flight.
pub struct PollTask {
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: JoinHandle<()>,
}

impl PollTask {
    /// Spawn the loop on the current tokio runtime
    pub fn spawn<F, Fut>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        // tokio panics on a zero period
        let period = period.max(Duration::from_millis(1));

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                // The first tick completes immediately
                tokio::select! {
                    biased;
                    _ = shutdown_rx.recv() => break,
                    _ = interval.tick() => {}
                }

                let flow = tokio::select! {
                    biased;
                    _ = shutdown_rx.recv() => break,
                    flow = tick() => flow,
                };

                if flow.is_break() {
                    break;
                }
            }

            log::trace!("Poll task stopped");
        });

        Self {
            shutdown_tx: Some(shutdown_tx),
            handle,
        }
    }

    /// Stop the loop. Idempotent.
    pub fn cancel(&mut self) {
        // Dropping the sender wakes the loop's recv() with None
        self.shutdown_tx.take();
    }

    pub fn is_cancelled(&self) -> bool {
        self.shutdown_tx.is_none()
    }

    /// Whether the loop task has exited
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for PollTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

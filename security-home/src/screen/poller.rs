use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Shortest accepted period; `interval_at` panics on zero.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// A repeating background task bound to the screen's lifetime.
///
/// The first tick fires one `period` after spawning. A tick still running
/// when the handle is stopped is abandoned. Dropping the handle cancels the
/// task as well, so it can never outlive its owner.
pub struct PollHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl PollHandle {
    pub fn spawn<F, Fut>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        let period = period.max(MIN_PERIOD);
        let token = CancellationToken::new();
        let cancelled = token.clone();

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let flow = tokio::select! {
                    _ = cancelled.cancelled() => break,
                    flow = tick() => flow,
                };

                if flow.is_break() {
                    tracing::debug!("Poller stopped by its tick");
                    break;
                }
            }
        });

        Self { token, task }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancel and wait for the task to exit.
    pub async fn stop(mut self) {
        self.token.cancel();
        if let Err(e) = (&mut self.task).await {
            if e.is_panic() {
                tracing::error!("Poller task panicked: {}", e);
            }
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

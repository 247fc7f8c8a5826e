use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::sink::{GameMessage, SharedSink};
use crate::tokio_tools::spawn_named_task;

use super::BlindStructure;

const LOG_TARGET: &str = "poker_league::blinds::scheduler";

/// Deliver one `BlindChanged` per alert in `structure`, each at or after
/// `start + offset`, without blocking the caller.
///
/// A single task walks the alerts in order, so a late timer delays the alerts
/// behind it instead of letting them overtake it. Must be called from within a
/// Tokio runtime.
pub fn schedule_blinds(
    start: Instant,
    structure: &BlindStructure,
    sink: SharedSink,
) -> ScheduledBlinds {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let alerts = structure.alerts().to_vec();

    let handle = spawn_named_task("blind-alerts", async move {
        for alert in alerts {
            let due = start + alert.offset;
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!(target = LOG_TARGET, "blind schedule cancelled");
                    return;
                }
                _ = sleep_until(due) => {}
            }

            if token.is_cancelled() {
                return;
            }

            let late_ms = Instant::now().saturating_duration_since(due).as_millis();
            match sink.deliver(GameMessage::BlindChanged {
                amount: alert.amount,
            }) {
                Ok(()) => debug!(
                    target = LOG_TARGET,
                    amount = alert.amount,
                    late_ms,
                    "blind changed"
                ),
                Err(err) => warn!(
                    target = LOG_TARGET,
                    amount = alert.amount,
                    error = %err,
                    "failed to deliver blind change"
                ),
            }
        }
        debug!(target = LOG_TARGET, "blind schedule complete");
    });

    ScheduledBlinds {
        cancel,
        handle: Some(handle),
    }
}

/// Handle to one hand's pending blind alerts. Dropping it cancels them.
#[derive(Debug)]
pub struct ScheduledBlinds {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl ScheduledBlinds {
    /// Suppress every alert that has not fired yet.
    pub fn cancel(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    #[cfg(test)]
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// True once every alert has been delivered or the schedule was cancelled.
    #[cfg(test)]
    pub(crate) fn is_finished(&self) -> bool {
        self.handle
            .as_ref()
            .map_or(true, |handle| handle.is_finished())
    }

    /// Wait until the last alert has been delivered.
    #[cfg(test)]
    pub(crate) async fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for ScheduledBlinds {
    fn drop(&mut self) {
        self.cancel();
    }
}

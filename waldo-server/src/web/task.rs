//! Running blocking planner work off the async runtime.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::task::JoinError;
use tracing::{debug, error};

/// How a stoppable task ended.
#[derive(Debug)]
pub enum StoppableOutcome<R> {
    /// The task finished in time.
    Completed(R),
    /// The deadline passed and the task gave up.
    TimedOut,
    /// The task panicked.
    Panicked(JoinError),
    /// The task ended without reporting a result.
    ChannelBreakdown,
}

/// Run `task` on the blocking pool, raising its stop flag once `timeout`
/// elapses.
///
/// The task returns `None` if it noticed the flag and stopped early. The
/// flag starts `false`.
pub async fn run_with_deadline<F, R>(timeout: Duration, task: F) -> StoppableOutcome<R>
where
    F: FnOnce(&AtomicBool) -> Option<R> + Send + 'static,
    R: Send + 'static,
{
    let stopper = Arc::new(AtomicBool::new(false));
    let task_stopper = Arc::clone(&stopper);

    // mpsc rather than oneshot: the receiver is polled again after the
    // timeout branch of select! has fired.
    let (result_send, mut result_receive) = tokio::sync::mpsc::channel(1);

    let handle = tokio::task::spawn_blocking(move || {
        let result = task(&task_stopper);
        if let Err(e) = result_send.blocking_send(result) {
            error!("sending task result failed: {e}");
        }
    });

    let result = tokio::select! {
        _ = tokio::time::sleep(timeout) => {
            debug!(?timeout, "deadline passed, stopping task");
            stopper.store(true, Ordering::SeqCst);
            result_receive.recv().await
        },
        result = result_receive.recv() => result,
    };

    if let Err(e) = handle.await {
        return StoppableOutcome::Panicked(e);
    }

    match result {
        None => StoppableOutcome::ChannelBreakdown,
        Some(None) => StoppableOutcome::TimedOut,
        Some(Some(r)) => StoppableOutcome::Completed(r),
    }
}

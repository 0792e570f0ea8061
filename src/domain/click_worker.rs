//! Background worker draining the click queue.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::click_recorder::ClickRecorder;

/// Consumes click events until every sender is dropped.
///
/// At most `concurrency` events are persisted at once. Once the channel closes,
/// in-flight events are awaited before the worker returns, so a graceful
/// shutdown does not lose queued clicks.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickEvent>,
    recorder: Arc<ClickRecorder>,
    concurrency: usize,
) {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    while let Some(event) = rx.recv().await {
        let permit = match semaphore.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => {
                warn!("Click worker semaphore closed");
                break;
            }
        };

        let recorder = recorder.clone();
        tasks.spawn(async move {
            let _permit = permit;
            recorder.record_with_retry(&event).await;
        });

        // Reap finished tasks so the set does not grow unbounded.
        while tasks.try_join_next().is_some() {}
    }

    while tasks.join_next().await.is_some() {}

    info!("Click worker stopped");
}

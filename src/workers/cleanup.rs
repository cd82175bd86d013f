use std::path::PathBuf;
use std::time::Duration;

use async_channel::{Receiver, Sender};
use futures_util::StreamExt;
use tokio::time::Instant;
use tokio_util::time::DelayQueue;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::infrastructure::storage::local::remove_dir_all;

/// A job directory due for deletion at `deadline`.
#[derive(Debug)]
pub struct CleanupTask {
    pub label: String,
    pub dir: PathBuf,
    pub deadline: Instant,
}

/// Handle used by request tasks to arm the fire-once deletion of a job
/// directory. Cheap to clone.
#[derive(Clone, Debug)]
pub struct CleanupScheduler {
    tx: Sender<CleanupTask>,
    retention: Duration,
}

impl CleanupScheduler {
    pub fn new(retention: Duration) -> (Self, Receiver<CleanupTask>) {
        let (tx, rx) = async_channel::unbounded();
        (Self { tx, retention }, rx)
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    /// Deletes `dir` once the retention delay has elapsed from now.
    pub fn schedule(&self, job_id: Uuid, dir: PathBuf) {
        self.schedule_at(job_id.to_string(), dir, Instant::now() + self.retention);
    }

    pub fn schedule_at(&self, label: String, dir: PathBuf, deadline: Instant) {
        let task = CleanupTask {
            label,
            dir,
            deadline,
        };

        if let Err(e) = self.tx.try_send(task) {
            let task = e.into_inner();
            warn!(
                "[cleanup] worker unavailable, job {} will not be removed automatically",
                task.label
            );
        }
    }
}

/// Owns every pending deletion. Runs until all schedulers are dropped and the
/// queue has drained.
pub async fn start_cleanup_worker(rx: Receiver<CleanupTask>) {
    info!("🧹 Starting Cleanup Worker...");

    let mut pending: DelayQueue<CleanupTask> = DelayQueue::new();
    let mut accepting = true;

    loop {
        tokio::select! {
            received = rx.recv(), if accepting => match received {
                Ok(task) => {
                    debug!("[cleanup] job {} armed", task.label);
                    let deadline = task.deadline;
                    pending.insert_at(task, deadline);
                }
                Err(_) => accepting = false,
            },
            Some(expired) = pending.next(), if !pending.is_empty() => {
                run_task(expired.into_inner()).await;
            }
            else => break,
        }
    }

    info!("🧹 Cleanup Worker stopped");
}

async fn run_task(task: CleanupTask) {
    match remove_dir_all(&task.dir).await {
        Ok(()) => info!("[cleanup] removed job {}", task.label),
        Err(e) => warn!("[cleanup] failed for job {}: {}", task.label, e),
    }
}

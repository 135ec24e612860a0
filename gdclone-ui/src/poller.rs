use std::time::Duration;

use gdclone_core::{CloneClient, ProgressSnapshot};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A snapshot forwarded by the poll task, tagged with the job it belongs
/// to so the session can discard events from a superseded job.
#[derive(Debug)]
pub struct ProgressEvent {
    pub task_id: String,
    pub snapshot: ProgressSnapshot,
}

/// Handle to the repeating progress poll. Aborting on drop guarantees the
/// timer is released on reset, supersession, or session teardown.
pub struct PollerHandle {
    task_id: String,
    handle: JoinHandle<()>,
}

impl PollerHandle {
    pub fn task_id(&self) -> &str {
        &self.task_id
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Polls the progress endpoint on a fixed cadence and forwards each
/// successful snapshot. Poll failures are logged and the previous
/// snapshot stands; the loop only exits after a terminal snapshot has
/// been forwarded or the receiving side is gone.
pub fn spawn_progress_poller(
    client: CloneClient,
    task_id: String,
    interval: Duration,
    tx: mpsc::UnboundedSender<ProgressEvent>,
) -> PollerHandle {
    let loop_task_id = task_id.clone();
    let handle = tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;
            match client.get_progress(&loop_task_id).await {
                Ok(snapshot) => {
                    let terminal = snapshot.status.is_terminal();
                    let event = ProgressEvent {
                        task_id: loop_task_id.clone(),
                        snapshot,
                    };
                    if tx.send(event).is_err() || terminal {
                        break;
                    }
                }
                Err(err) => {
                    eprintln!("[gdclone-ui] progress poll error for task {loop_task_id}: {err}");
                }
            }
        }
    });
    PollerHandle { task_id, handle }
}

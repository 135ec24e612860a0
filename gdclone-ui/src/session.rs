use std::time::Duration;

use gdclone_core::{CloneApiError, CloneClient, ProgressSnapshot, ResolvedItem};
use tokio::sync::mpsc;
use url::Url;

use crate::poller::{PollerHandle, ProgressEvent, spawn_progress_poller};

const MSG_EMPTY_URL: &str = "Please enter a Google Drive URL";
const MSG_NETWORK: &str = "Network error. Please try again.";
const MSG_PARSE_FALLBACK: &str = "Failed to parse URL";
const MSG_CLONE_FALLBACK: &str = "Failed to start clone";
const MSG_LOGIN_FAILED: &str = "Failed to initiate Google login";
const MSG_CLONE_FAILED: &str = "Clone operation failed. Please try again.";

#[derive(Debug, Clone)]
pub struct CloneJob {
    pub task_id: String,
    pub snapshot: ProgressSnapshot,
}

/// Owns every piece of UI-visible state and drives it through the
/// request/poll/terminate cycle against the clone backend. At most one
/// resolved item and one clone job are live at a time; starting a new
/// parse or clone discards the previous one.
pub struct Session {
    client: CloneClient,
    poll_interval: Duration,
    authenticated: bool,
    source_url: String,
    loading: bool,
    resolved: Option<ResolvedItem>,
    job: Option<CloneJob>,
    error: Option<String>,
    success: Option<String>,
    poller: Option<PollerHandle>,
    progress_tx: mpsc::UnboundedSender<ProgressEvent>,
    progress_rx: mpsc::UnboundedReceiver<ProgressEvent>,
}

impl Session {
    pub fn new(client: CloneClient, poll_interval: Duration) -> Self {
        let (progress_tx, progress_rx) = mpsc::unbounded_channel();
        Self {
            client,
            poll_interval,
            authenticated: false,
            source_url: String::new(),
            loading: false,
            resolved: None,
            job: None,
            error: None,
            success: None,
            poller: None,
            progress_tx,
            progress_rx,
        }
    }

    pub fn authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn set_source_url(&mut self, url: impl Into<String>) {
        self.source_url = url.into();
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn resolved(&self) -> Option<&ResolvedItem> {
        self.resolved.as_ref()
    }

    pub fn job(&self) -> Option<&CloneJob> {
        self.job.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    /// True while the repeating progress poll is running, which is
    /// exactly when a job exists whose snapshot is not yet terminal.
    pub fn polling(&self) -> bool {
        self.poller.is_some()
    }

    /// Queries the backend auth-status endpoint. Failures are logged and
    /// otherwise ignored; the flag keeps its previous value.
    pub async fn check_auth(&mut self) {
        match self.client.auth_status().await {
            Ok(status) => self.authenticated = status.authenticated,
            Err(err) => eprintln!("[gdclone-ui] auth status check failed: {err}"),
        }
    }

    /// Fetches the login URL for the front end to open in a browser. The
    /// backend redirects back to the app after consent, and the next
    /// `check_auth` picks the session up.
    pub async fn login(&mut self) -> Option<Url> {
        match self.client.login_url().await {
            Ok(login) => Some(login.auth_url),
            Err(err) => {
                eprintln!("[gdclone-ui] login request failed: {err}");
                self.error = Some(MSG_LOGIN_FAILED.to_string());
                None
            }
        }
    }

    /// Resolves the current source URL into item metadata. An empty URL
    /// fails validation before any request goes out.
    pub async fn parse_url(&mut self) {
        let share_url = self.source_url.trim().to_string();
        if share_url.is_empty() {
            self.error = Some(MSG_EMPTY_URL.to_string());
            return;
        }

        self.loading = true;
        self.error = None;
        self.resolved = None;
        match self.client.parse_url(&share_url).await {
            Ok(item) => self.resolved = Some(item),
            Err(err) => self.error = Some(user_message(&err, MSG_PARSE_FALLBACK)),
        }
        self.loading = false;
    }

    /// Starts a clone of the resolved item. A no-op when nothing is
    /// resolved. Any previous job and its poll timer are discarded
    /// before the request goes out.
    pub async fn start_clone(&mut self) {
        let Some(file_id) = self.resolved.as_ref().map(|item| item.id.clone()) else {
            return;
        };

        self.loading = true;
        self.error = None;
        self.success = None;
        self.job = None;
        self.stop_poller();
        match self.client.start_clone(&file_id).await {
            Ok(started) => {
                self.job = Some(CloneJob {
                    task_id: started.task_id.clone(),
                    snapshot: ProgressSnapshot::starting(),
                });
                self.poller = Some(spawn_progress_poller(
                    self.client.clone(),
                    started.task_id,
                    self.poll_interval,
                    self.progress_tx.clone(),
                ));
            }
            Err(err) => self.error = Some(user_message(&err, MSG_CLONE_FALLBACK)),
        }
        self.loading = false;
    }

    /// Waits for the next poll result and folds it into the job state.
    /// Returns whether a snapshot was applied. Events for a superseded
    /// job are dropped.
    pub async fn next_progress(&mut self) -> bool {
        if self.poller.is_none() {
            return false;
        }
        let Some(event) = self.progress_rx.recv().await else {
            return false;
        };
        self.apply_progress(event)
    }

    fn apply_progress(&mut self, event: ProgressEvent) -> bool {
        let Some(job) = self
            .job
            .as_mut()
            .filter(|job| job.task_id == event.task_id)
        else {
            eprintln!(
                "[gdclone-ui] dropping stale progress for task {}",
                event.task_id
            );
            return false;
        };

        job.snapshot = event.snapshot;
        if job.snapshot.status.is_completed() {
            self.success = Some(match job.snapshot.result.as_ref() {
                Some(result) => format!("Successfully cloned \"{}\"!", result.name),
                None => "Clone completed successfully.".to_string(),
            });
            self.poller = None;
        } else if job.snapshot.status.is_failed() {
            self.error = Some(MSG_CLONE_FAILED.to_string());
            self.poller = None;
        }
        true
    }

    /// Returns the session to its initial state. Dropping the poller
    /// handle stops the poll timer; no network calls are made.
    pub fn reset(&mut self) {
        self.source_url.clear();
        self.resolved = None;
        self.job = None;
        self.error = None;
        self.success = None;
        self.stop_poller();
    }

    // Dropping the handle aborts the poll task, so a superseded job can
    // never keep a second timer alive.
    fn stop_poller(&mut self) {
        if let Some(poller) = self.poller.take() {
            eprintln!(
                "[gdclone-ui] stopping progress poll for task {}",
                poller.task_id()
            );
        }
    }

    #[cfg(test)]
    fn inject_progress(&self, event: ProgressEvent) {
        self.progress_tx
            .send(event)
            .expect("session holds the receiver");
    }
}

fn user_message(err: &CloneApiError, fallback: &str) -> String {
    if err.is_api_error() {
        err.api_message().unwrap_or(fallback).to_string()
    } else {
        MSG_NETWORK.to_string()
    }
}

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum CloneApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("api returned {}: {}", status, message.as_deref().unwrap_or("<no error body>"))]
    Api {
        status: StatusCode,
        message: Option<String>,
    },
}

impl CloneApiError {
    /// Backend-reported message from a non-2xx `{error: ...}` body, if any.
    pub fn api_message(&self) -> Option<&str> {
        match self {
            CloneApiError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_api_error(&self) -> bool {
        matches!(self, CloneApiError::Api { .. })
    }
}

#[derive(Clone)]
pub struct CloneClient {
    http: Client,
    base_url: String,
}

impl CloneClient {
    /// The backend keys parse/clone/progress calls to the login session
    /// via cookies, so the client carries a cookie store.
    pub fn with_base_url(base_url: &str) -> Result<Self, CloneApiError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)?;
        Ok(Self {
            http: Client::builder().cookie_store(true).build()?,
            base_url,
        })
    }

    pub async fn auth_status(&self) -> Result<AuthStatus, CloneApiError> {
        let url = self.endpoint("/auth/status")?;
        let response = self.http.get(url).send().await?;
        Self::handle_response(response).await
    }

    pub async fn login_url(&self) -> Result<LoginUrl, CloneApiError> {
        let url = self.endpoint("/auth/login")?;
        let response = self.http.get(url).send().await?;
        Self::handle_response(response).await
    }

    pub async fn parse_url(&self, share_url: &str) -> Result<ResolvedItem, CloneApiError> {
        let url = self.endpoint("/parse-url")?;
        let response = self
            .http
            .post(url)
            .json(&ParseUrlRequest { url: share_url })
            .send()
            .await?;
        Self::handle_response(response).await
    }

    pub async fn start_clone(&self, file_id: &str) -> Result<CloneStarted, CloneApiError> {
        let url = self.endpoint("/clone")?;
        let response = self
            .http
            .post(url)
            .json(&StartCloneRequest { file_id })
            .send()
            .await?;
        Self::handle_response(response).await
    }

    pub async fn get_progress(&self, task_id: &str) -> Result<ProgressSnapshot, CloneApiError> {
        let url = self.endpoint(&format!("/progress/{task_id}"))?;
        let response = self.http.get(url).send().await?;
        Self::handle_response(response).await
    }

    // The base url may carry a path segment ("/api"), so endpoints are
    // appended to it rather than resolved with Url::join.
    fn endpoint(&self, path: &str) -> Result<Url, CloneApiError> {
        Ok(Url::parse(&format!("{}{}", self.base_url, path))?)
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, CloneApiError> {
        if response.status().is_success() {
            Ok(response.json::<T>().await?)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .map(|body| body.error);
            Err(CloneApiError::Api { status, message })
        }
    }
}

#[derive(Serialize)]
struct ParseUrlRequest<'a> {
    url: &'a str,
}

#[derive(Serialize)]
struct StartCloneRequest<'a> {
    file_id: &'a str,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AuthStatus {
    pub authenticated: bool,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginUrl {
    pub auth_url: Url,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolvedItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    /// Size in bytes as reported by Drive, or the literal "Unknown".
    pub size: String,
    #[serde(default)]
    pub item_count: Option<u64>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    File,
    Folder,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CloneStarted {
    pub task_id: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProgressSnapshot {
    pub status: TaskStatus,
    #[serde(default)]
    pub percentage: f64,
    #[serde(default)]
    pub completed: u64,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub current_file: Option<String>,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub result: Option<CloneResult>,
}

impl ProgressSnapshot {
    /// Seed snapshot recorded between starting a clone and the first poll.
    pub fn starting() -> Self {
        Self {
            status: TaskStatus::new(TaskStatus::STARTING),
            percentage: 0.0,
            completed: 0,
            total: 0,
            current_file: None,
            errors: Vec::new(),
            result: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CloneResult {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

/// Job status as reported by the backend. Only `completed` and `failed`
/// are terminal; anything else means the job is still running, so new
/// intermediate status names do not break the client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct TaskStatus(String);

impl TaskStatus {
    pub const STARTING: &'static str = "starting";
    pub const COMPLETED: &'static str = "completed";
    pub const FAILED: &'static str = "failed";

    pub fn new(status: impl Into<String>) -> Self {
        Self(status.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_completed(&self) -> bool {
        self.0 == Self::COMPLETED
    }

    pub fn is_failed(&self) -> bool {
        self.0 == Self::FAILED
    }

    pub fn is_terminal(&self) -> bool {
        self.is_completed() || self.is_failed()
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

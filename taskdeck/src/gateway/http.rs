//! HTTP implementation of the [`Gateway`] trait.
//!
//! Owns request construction (bearer header, query parameters, JSON
//! bodies) and response validation (status-code mapping, body
//! decoding). Dates cross the boundary as ISO-8601 instants inside the
//! JSON payloads.

use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use taskdeck_proto::auth::{AuthResponse, Credentials};
use taskdeck_proto::comment::{Comment, NewComment};
use taskdeck_proto::filter::TaskFilter;
use taskdeck_proto::task::{Status, StatusChange, Task, TaskDraft};
use taskdeck_proto::user::User;

use super::{ApiError, Gateway};

/// Error payload the server attaches to rejections.
///
/// Either field may carry the human-readable detail.
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    details: Option<String>,
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

/// Gateway backed by the remote HTTP service.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpGateway {
    /// Creates a gateway with a default client.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Creates a gateway with a caller-configured client (timeouts,
    /// proxies, and so on).
    #[must_use]
    pub const fn with_client(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// Builds an endpoint URL under the base.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::Network("api url cannot be a base".to_string()))?
            .extend(segments);
        Ok(url)
    }

    /// Decodes a successful response body, or maps the failure status.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            response
                .json()
                .await
                .map_err(|err| ApiError::Network(format!("invalid response body: {err}")))
        } else {
            Err(map_failure(status, response).await)
        }
    }
}

/// Maps a non-success response to the error taxonomy, pulling the
/// human-readable detail out of the body when the server provides one.
async fn map_failure(status: StatusCode, response: reqwest::Response) -> ApiError {
    let body_detail = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error.or(body.details));
    let detail = |fallback: &str| body_detail.clone().unwrap_or_else(|| fallback.to_string());
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Auth,
        StatusCode::NOT_FOUND => ApiError::NotFound(detail("resource not found")),
        StatusCode::CONFLICT => ApiError::Conflict(detail("update rejected")),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ApiError::Validation(detail("request rejected"))
        }
        other => ApiError::Network(format!("unexpected status {other}")),
    }
}

impl Gateway for HttpGateway {
    async fn log_in(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let url = self.endpoint(&["auth", "login"])?;
        let response = self.client.post(url).json(credentials).send().await?;
        Self::decode(response).await
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let url = self.endpoint(&["auth", "signup"])?;
        let response = self.client.post(url).json(credentials).send().await?;
        Self::decode(response).await
    }

    async fn list_tasks(&self, token: &str, filter: &TaskFilter) -> Result<Vec<Task>, ApiError> {
        let mut url = self.endpoint(&["tasks"])?;
        let pairs = filter.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        let response = self.client.get(url).bearer_auth(token).send().await?;
        Self::decode(response).await
    }

    async fn list_users(&self, token: &str) -> Result<Vec<User>, ApiError> {
        let url = self.endpoint(&["tasks", "users"])?;
        let response = self.client.get(url).bearer_auth(token).send().await?;
        Self::decode(response).await
    }

    async fn get_task(&self, token: &str, id: &str) -> Result<Task, ApiError> {
        let url = self.endpoint(&["tasks", id])?;
        let response = self.client.get(url).bearer_auth(token).send().await?;
        Self::decode(response).await
    }

    async fn create_task(&self, token: &str, draft: &TaskDraft) -> Result<Task, ApiError> {
        let url = self.endpoint(&["tasks"])?;
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(draft)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn update_status(&self, token: &str, id: &str, status: Status) -> Result<Task, ApiError> {
        let url = self.endpoint(&["tasks", id])?;
        let response = self
            .client
            .put(url)
            .bearer_auth(token)
            .json(&StatusChange { status })
            .send()
            .await?;
        // A vanished task is a transition conflict from the caller's
        // point of view, not a missing resource.
        match Self::decode(response).await {
            Err(ApiError::NotFound(detail)) => Err(ApiError::Conflict(detail)),
            result => result,
        }
    }

    async fn list_comments(&self, token: &str, id: &str) -> Result<Vec<Comment>, ApiError> {
        let url = self.endpoint(&["tasks", id, "comments"])?;
        let response = self.client.get(url).bearer_auth(token).send().await?;
        Self::decode(response).await
    }

    async fn add_comment(&self, token: &str, id: &str, body: &str) -> Result<Comment, ApiError> {
        let url = self.endpoint(&["tasks", id, "comments"])?;
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&NewComment {
                body: body.to_string(),
            })
            .send()
            .await?;
        Self::decode(response).await
    }
}

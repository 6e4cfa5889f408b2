//! Remote task service gateway.
//!
//! Defines the [`Gateway`] trait that all service implementations must
//! satisfy. Concrete implementations:
//! - [`http::HttpGateway`] — reqwest-based client for the real service
//! - [`mock::MockGateway`] — in-process fake for tests and offline use
//!
//! Gateway operations are side-effect-free on local state: they return
//! data for the caller to merge explicitly, which keeps the board
//! store's reconciliation logic independently testable.

pub mod http;
pub mod mock;

use taskdeck_proto::auth::{AuthResponse, Credentials};
use taskdeck_proto::comment::Comment;
use taskdeck_proto::filter::TaskFilter;
use taskdeck_proto::task::{Status, Task, TaskDraft};
use taskdeck_proto::user::User;

/// Errors surfaced by gateway operations.
///
/// Every remote failure is converted into one of these kinds at the
/// boundary of the operation that issued it. The core performs no
/// retries; a caller may retry manually.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Credential missing or rejected. The session must end.
    #[error("authorization rejected")]
    Auth,

    /// The server (or client-side pre-check) rejected a submitted
    /// payload. Recoverable: the user corrects the input.
    #[error("request rejected: {0}")]
    Validation(String),

    /// A status transition was rejected, or the task no longer exists.
    #[error("conflicting update: {0}")]
    Conflict(String),

    /// The requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Transport failure or an undecodable response.
    #[error("network failure: {0}")]
    Network(String),
}

/// Async seam over the remote task-and-comment service.
///
/// All operations except [`log_in`](Gateway::log_in) and
/// [`sign_up`](Gateway::sign_up) carry the caller's bearer token.
/// Everything is idempotent except `create_task` and `add_comment`.
pub trait Gateway: Send + Sync {
    /// Exchanges credentials for a bearer token and user record.
    fn log_in(
        &self,
        credentials: &Credentials,
    ) -> impl std::future::Future<Output = Result<AuthResponse, ApiError>> + Send;

    /// Creates an account and returns the same shape as login.
    fn sign_up(
        &self,
        credentials: &Credentials,
    ) -> impl std::future::Future<Output = Result<AuthResponse, ApiError>> + Send;

    /// Lists tasks matching the filter. An empty list is a success.
    fn list_tasks(
        &self,
        token: &str,
        filter: &TaskFilter,
    ) -> impl std::future::Future<Output = Result<Vec<Task>, ApiError>> + Send;

    /// Lists all known users. Callers must treat a failure as "no
    /// additional users learned this call", not as fatal.
    fn list_users(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<Vec<User>, ApiError>> + Send;

    /// Fetches a single task by id.
    fn get_task(
        &self,
        token: &str,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Task, ApiError>> + Send;

    /// Creates a task from a draft; the server assigns id, creation
    /// instant, badge, and the initial status.
    fn create_task(
        &self,
        token: &str,
        draft: &TaskDraft,
    ) -> impl std::future::Future<Output = Result<Task, ApiError>> + Send;

    /// Moves a task to a new status, returning the updated task.
    ///
    /// Fails with [`ApiError::Conflict`] when the task no longer exists
    /// or the transition is rejected server-side.
    fn update_status(
        &self,
        token: &str,
        id: &str,
        status: Status,
    ) -> impl std::future::Future<Output = Result<Task, ApiError>> + Send;

    /// Lists a task's comment thread in chronological order.
    fn list_comments(
        &self,
        token: &str,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Comment>, ApiError>> + Send;

    /// Appends a comment to a task's thread. The body must be non-empty
    /// after trimming; callers enforce this before issuing the request.
    fn add_comment(
        &self,
        token: &str,
        id: &str,
        body: &str,
    ) -> impl std::future::Future<Output = Result<Comment, ApiError>> + Send;
}

//! Application facade: one owned struct holding all client state.
//!
//! `App` ties the session, board store, overlay, and filter together
//! and orchestrates gateway calls against them. There are no ambient
//! singletons; everything the UI needs hangs off this struct, and all
//! mutation runs through its methods one event at a time.

use taskdeck_proto::auth::{AuthResponse, Credentials};
use taskdeck_proto::comment::Comment;
use taskdeck_proto::filter::TaskFilter;
use taskdeck_proto::task::{Status, Task, TaskDraft};

use crate::board::{BoardStore, Transition};
use crate::gateway::{ApiError, Gateway};
use crate::overlay::Overlay;
use crate::session::{Identity, Session, SessionError};

/// Errors surfaced by application operations.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A gateway operation failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The credential returned by the server could not be installed.
    #[error("credential rejected: {0}")]
    Session(#[from] SessionError),
}

/// Result of a drag-and-drop status move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The task was absent or already at the target status; no remote
    /// call was issued.
    Unchanged,
    /// The server confirmed the move and its record was adopted.
    Confirmed,
}

/// Client application state over some gateway implementation.
pub struct App<G> {
    gateway: G,
    session: Session,
    board: BoardStore,
    overlay: Overlay,
    filter: TaskFilter,
}

impl<G: Gateway> App<G> {
    /// Creates an unauthenticated app over the given gateway.
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            session: Session::new(),
            board: BoardStore::new(),
            overlay: Overlay::new(),
            filter: TaskFilter::new(),
        }
    }

    /// The underlying gateway.
    #[must_use]
    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    /// The current session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// The board store (tasks and users).
    #[must_use]
    pub const fn board(&self) -> &BoardStore {
        &self.board
    }

    /// The detail overlay.
    #[must_use]
    pub const fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// The active filter.
    #[must_use]
    pub const fn filter(&self) -> &TaskFilter {
        &self.filter
    }

    /// Logs in and loads the initial board.
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] when authentication or the initial fetch
    /// fails.
    pub async fn log_in(&mut self, credentials: &Credentials) -> Result<Identity, AppError> {
        let auth = self.gateway.log_in(credentials).await?;
        self.start_session(auth).await
    }

    /// Creates an account, then behaves like [`log_in`](Self::log_in).
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] when signup or the initial fetch fails.
    pub async fn sign_up(&mut self, credentials: &Credentials) -> Result<Identity, AppError> {
        let auth = self.gateway.sign_up(credentials).await?;
        self.start_session(auth).await
    }

    async fn start_session(&mut self, auth: AuthResponse) -> Result<Identity, AppError> {
        let identity = self.session.log_in(auth.token)?;
        tracing::info!(user = %identity.email, "session started");
        self.load_users().await;
        self.refresh().await?;
        Ok(identity)
    }

    /// Ends the session and discards every piece of cached state.
    pub fn log_out(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.session.log_out();
        self.board.clear();
        self.overlay.close();
        self.filter = TaskFilter::new();
    }

    /// Refetches the task list under the active filter.
    ///
    /// A response superseded by a newer fetch is discarded by the
    /// board's stale-response guard.
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] when the listing call fails.
    pub async fn refresh(&mut self) -> Result<(), AppError> {
        let token = self.token()?;
        let filter = self.filter.clone();
        let ticket = self.board.begin_fetch();
        let result = self.gateway.list_tasks(&token, &filter).await;
        let tasks = self.check(result)?;
        if !self.board.apply_fetch(ticket, tasks) {
            tracing::debug!("discarding superseded task list response");
        }
        Ok(())
    }

    /// Merges the dedicated user listing into the board.
    ///
    /// A failure here is never fatal: no additional users are learned
    /// this call, and the incidental assignee knowledge stands.
    pub async fn load_users(&mut self) {
        let Ok(token) = self.token() else { return };
        match self.gateway.list_users(&token).await {
            Ok(users) => self.board.merge_users(users),
            Err(ApiError::Auth) => {
                tracing::warn!("credential rejected during user listing; ending session");
                self.reset();
            }
            Err(err) => {
                tracing::warn!(%err, "user listing failed; keeping known users");
            }
        }
    }

    /// Installs a new filter and refetches under it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] when the refetch fails.
    pub async fn set_filter(&mut self, filter: TaskFilter) -> Result<(), AppError> {
        self.filter = filter;
        self.refresh().await
    }

    /// Creates a task and merges the server's record into the board.
    ///
    /// The draft is validated client-side first, including that any
    /// assignee id refers to a known user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] on validation or gateway failure. A failed
    /// create mutates no local state.
    pub async fn create_task(&mut self, draft: &TaskDraft) -> Result<Task, AppError> {
        draft
            .validate()
            .map_err(|err| ApiError::Validation(err.to_string()))?;
        if let Some(id) = draft.assignee_id.as_deref() {
            if self.board.user(id).is_none() {
                return Err(ApiError::Validation(format!("unknown assignee: {id}")).into());
            }
        }
        let token = self.token()?;
        let result = self.gateway.create_task(&token, draft).await;
        let task = self.check(result)?;
        tracing::info!(task = %task.id, "task created");
        self.board.upsert(task.clone());
        Ok(task)
    }

    /// Moves a task to a new status: optimistic local update, remote
    /// confirmation, rollback on rejection.
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] when the server rejects the move; the local
    /// status has been rolled back by then, never left dangling.
    pub async fn move_task(&mut self, id: &str, status: Status) -> Result<MoveOutcome, AppError> {
        let token = self.token()?;
        let Transition::Started { previous } = self.board.begin_transition(id, status) else {
            return Ok(MoveOutcome::Unchanged);
        };
        tracing::debug!(task = id, from = %previous, to = %status, "optimistic status change");
        let result = self.gateway.update_status(&token, id, status).await;
        match result {
            Ok(task) => {
                self.board.confirm_transition(task);
                Ok(MoveOutcome::Confirmed)
            }
            Err(err) => {
                self.board.roll_back_transition(id, previous);
                tracing::warn!(task = id, %err, "status change rejected; rolled back");
                self.check(Err(err))
            }
        }
    }

    /// Opens the detail overlay for a task, fetching the task record
    /// and its comment thread concurrently.
    ///
    /// The overlay is populated only when both fetches succeed and no
    /// close or newer open happened in between; otherwise it stays
    /// closed and the failure is surfaced.
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] when either fetch fails.
    pub async fn open_task(&mut self, id: &str) -> Result<(), AppError> {
        let token = self.token()?;
        let ticket = self.overlay.begin_open();
        let (task, comments) = tokio::join!(
            self.gateway.get_task(&token, id),
            self.gateway.list_comments(&token, id),
        );
        let (task, comments) = match (task, comments) {
            (Ok(task), Ok(comments)) => (task, comments),
            (Err(err), _) | (_, Err(err)) => return self.check(Err(err)),
        };
        if !self.overlay.complete_open(ticket, task, comments) {
            tracing::debug!(task = id, "detail fetch resolved after overlay moved on");
        }
        Ok(())
    }

    /// Closes the detail overlay.
    pub fn close_task(&mut self) {
        self.overlay.close();
    }

    /// Adds a comment to the currently open task.
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] when the body is blank after trimming, no
    /// task is open, or the gateway call fails.
    pub async fn add_comment(&mut self, body: &str) -> Result<Comment, AppError> {
        let body = body.trim();
        if body.is_empty() {
            return Err(ApiError::Validation("comment body cannot be empty".to_string()).into());
        }
        let Some(task_id) = self.overlay.open_task().map(|t| t.id.clone()) else {
            return Err(ApiError::Validation("no task is open".to_string()).into());
        };
        let token = self.token()?;
        let result = self.gateway.add_comment(&token, &task_id, body).await;
        let comment = self.check(result)?;
        if !self.overlay.append_comment(&task_id, comment.clone()) {
            tracing::debug!(task = %task_id, "comment confirmed after overlay moved on");
        }
        Ok(comment)
    }

    /// The current bearer token, or an auth failure when there is none.
    fn token(&self) -> Result<String, AppError> {
        self.session
            .token()
            .map(str::to_owned)
            .ok_or(AppError::Api(ApiError::Auth))
    }

    /// Converts a gateway failure into an app error, forcing a return
    /// to the unauthenticated state when the credential was rejected.
    fn check<T>(&mut self, result: Result<T, ApiError>) -> Result<T, AppError> {
        result.map_err(|err| {
            if matches!(err, ApiError::Auth) {
                tracing::warn!("credential rejected; ending session");
                self.reset();
            }
            AppError::Api(err)
        })
    }
}

//! In-process gateway for tests and offline use.
//!
//! Holds a scripted server state behind a mutex and answers the same
//! [`Gateway`] operations the HTTP implementation does, including
//! server-side filtering, badge recomputation on updates, and one-shot
//! failure injection per operation.

use std::collections::HashMap;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use parking_lot::Mutex;
use uuid::Uuid;

use taskdeck_proto::auth::{AuthResponse, Credentials};
use taskdeck_proto::comment::Comment;
use taskdeck_proto::filter::TaskFilter;
use taskdeck_proto::task::{Status, Task, TaskDraft};
use taskdeck_proto::user::User;

use crate::session;

use super::{ApiError, Gateway};

#[derive(Debug, Default)]
struct MockState {
    users: Vec<User>,
    tasks: Vec<Task>,
    comments: HashMap<String, Vec<Comment>>,
    /// Per-task revision counter; the mock's "server-computed" badge is
    /// `v{revision}` so reconciliation of authoritative fields is
    /// observable in tests.
    revisions: HashMap<String, u64>,
    fail_next_list_tasks: Option<ApiError>,
    fail_next_list_users: Option<ApiError>,
    fail_next_get_task: Option<ApiError>,
    fail_next_update_status: Option<ApiError>,
    fail_next_list_comments: Option<ApiError>,
    update_status_calls: usize,
}

/// Scripted in-process implementation of [`Gateway`].
#[derive(Debug, Default)]
pub struct MockGateway {
    state: Mutex<MockState>,
}

impl MockGateway {
    /// Creates an empty mock service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user without going through signup.
    pub fn seed_user(&self, user: User) {
        self.state.lock().users.push(user);
    }

    /// Installs a task (and an empty comment thread for it).
    pub fn seed_task(&self, task: Task) {
        let mut state = self.state.lock();
        state.comments.entry(task.id.clone()).or_default();
        state.revisions.insert(task.id.clone(), 1);
        state.tasks.push(task);
    }

    /// Appends a comment to a seeded task's thread.
    pub fn seed_comment(&self, task_id: &str, comment: Comment) {
        self.state
            .lock()
            .comments
            .entry(task_id.to_string())
            .or_default()
            .push(comment);
    }

    /// Makes the next `list_tasks` call fail with the given error.
    pub fn fail_next_list_tasks(&self, err: ApiError) {
        self.state.lock().fail_next_list_tasks = Some(err);
    }

    /// Makes the next `list_users` call fail with the given error.
    pub fn fail_next_list_users(&self, err: ApiError) {
        self.state.lock().fail_next_list_users = Some(err);
    }

    /// Makes the next `get_task` call fail with the given error.
    pub fn fail_next_get_task(&self, err: ApiError) {
        self.state.lock().fail_next_get_task = Some(err);
    }

    /// Makes the next `update_status` call fail with the given error.
    pub fn fail_next_update_status(&self, err: ApiError) {
        self.state.lock().fail_next_update_status = Some(err);
    }

    /// Makes the next `list_comments` call fail with the given error.
    pub fn fail_next_list_comments(&self, err: ApiError) {
        self.state.lock().fail_next_list_comments = Some(err);
    }

    /// How many `update_status` calls have reached the mock server.
    #[must_use]
    pub fn update_status_calls(&self) -> usize {
        self.state.lock().update_status_calls
    }

    /// Snapshot of the mock server's current task set.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.state.lock().tasks.clone()
    }

    /// Issues a JWT-shaped token carrying the user's claims, decodable
    /// by the session holder.
    #[must_use]
    pub fn token_for(user: &User) -> String {
        let header = URL_SAFE_NO_PAD.encode(b"{\"alg\":\"none\"}");
        let claims = format!(r#"{{"sub":"{}","email":"{}"}}"#, user.id, user.email);
        let payload = URL_SAFE_NO_PAD.encode(claims.as_bytes());
        format!("{header}.{payload}.mock")
    }
}

/// Resolves the bearer token to the calling user, or rejects it.
fn authorize(token: &str) -> Result<User, ApiError> {
    let identity = session::decode_identity(token).map_err(|_| ApiError::Auth)?;
    Ok(User {
        id: identity.id,
        email: identity.email,
    })
}

fn badge_for(revision: u64) -> String {
    format!("v{revision}")
}

impl Gateway for MockGateway {
    async fn log_in(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            return Err(ApiError::Validation("email and password are required".to_string()));
        }
        let mut state = self.state.lock();
        let user = match state.users.iter().find(|u| u.email == credentials.email) {
            Some(user) => user.clone(),
            None => {
                let user = User {
                    id: format!("u-{}", Uuid::now_v7()),
                    email: credentials.email.clone(),
                };
                state.users.push(user.clone());
                user
            }
        };
        Ok(AuthResponse {
            token: Self::token_for(&user),
            user,
        })
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            return Err(ApiError::Validation("email and password are required".to_string()));
        }
        let mut state = self.state.lock();
        if state.users.iter().any(|u| u.email == credentials.email) {
            return Err(ApiError::Validation("email already registered".to_string()));
        }
        let user = User {
            id: format!("u-{}", Uuid::now_v7()),
            email: credentials.email.clone(),
        };
        state.users.push(user.clone());
        Ok(AuthResponse {
            token: Self::token_for(&user),
            user,
        })
    }

    async fn list_tasks(&self, token: &str, filter: &TaskFilter) -> Result<Vec<Task>, ApiError> {
        authorize(token)?;
        let mut state = self.state.lock();
        if let Some(err) = state.fail_next_list_tasks.take() {
            return Err(err);
        }
        Ok(state
            .tasks
            .iter()
            .filter(|t| filter.matches(t.assignee.as_ref().map(|u| u.id.as_str()), t.priority))
            .cloned()
            .collect())
    }

    async fn list_users(&self, token: &str) -> Result<Vec<User>, ApiError> {
        authorize(token)?;
        let mut state = self.state.lock();
        if let Some(err) = state.fail_next_list_users.take() {
            return Err(err);
        }
        Ok(state.users.clone())
    }

    async fn get_task(&self, token: &str, id: &str) -> Result<Task, ApiError> {
        authorize(token)?;
        let mut state = self.state.lock();
        if let Some(err) = state.fail_next_get_task.take() {
            return Err(err);
        }
        state
            .tasks
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("task {id} not found")))
    }

    async fn create_task(&self, token: &str, draft: &TaskDraft) -> Result<Task, ApiError> {
        authorize(token)?;
        draft
            .validate()
            .map_err(|err| ApiError::Validation(err.to_string()))?;
        let mut state = self.state.lock();
        let assignee = match draft.assignee_id.as_deref() {
            Some(id) => Some(
                state
                    .users
                    .iter()
                    .find(|u| u.id == id)
                    .cloned()
                    .ok_or_else(|| ApiError::Validation(format!("unknown assignee: {id}")))?,
            ),
            None => None,
        };
        let task = Task {
            id: format!("t-{}", Uuid::now_v7()),
            title: draft.title.clone(),
            description: draft.description.clone(),
            priority: draft.priority,
            status: Status::Backlog,
            assignee,
            due_date: draft.due_date,
            badge: badge_for(1),
            created_at: Utc::now(),
        };
        state.comments.entry(task.id.clone()).or_default();
        state.revisions.insert(task.id.clone(), 1);
        state.tasks.push(task.clone());
        Ok(task)
    }

    async fn update_status(&self, token: &str, id: &str, status: Status) -> Result<Task, ApiError> {
        authorize(token)?;
        let mut state = self.state.lock();
        state.update_status_calls += 1;
        if let Some(err) = state.fail_next_update_status.take() {
            return Err(err);
        }
        let revision = state.revisions.entry(id.to_string()).or_insert(1);
        *revision += 1;
        let badge = badge_for(*revision);
        let task = state
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ApiError::Conflict(format!("task {id} no longer exists")))?;
        task.status = status;
        task.badge = badge;
        Ok(task.clone())
    }

    async fn list_comments(&self, token: &str, id: &str) -> Result<Vec<Comment>, ApiError> {
        authorize(token)?;
        let mut state = self.state.lock();
        if let Some(err) = state.fail_next_list_comments.take() {
            return Err(err);
        }
        state
            .comments
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("task {id} not found")))
    }

    async fn add_comment(&self, token: &str, id: &str, body: &str) -> Result<Comment, ApiError> {
        let author = authorize(token)?;
        let body = body.trim();
        if body.is_empty() {
            return Err(ApiError::Validation("comment body cannot be empty".to_string()));
        }
        let mut state = self.state.lock();
        let Some(thread) = state.comments.get_mut(id) else {
            return Err(ApiError::NotFound(format!("task {id} not found")));
        };
        let comment = Comment {
            id: format!("c-{}", Uuid::now_v7()),
            body: body.to_string(),
            author,
            created_at: Utc::now(),
        };
        thread.push(comment.clone());
        Ok(comment)
    }
}

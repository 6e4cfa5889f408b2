//! Comment model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::user::User;

/// A comment attached to a task's thread.
///
/// Comments are append-only; the server assigns `id` and `created_at`
/// and the thread is returned in chronological insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Server-assigned identifier.
    pub id: String,
    /// Non-empty comment body.
    pub body: String,
    /// The user who wrote the comment.
    pub author: User,
    /// Server-assigned creation instant.
    pub created_at: DateTime<Utc>,
}

/// Body of the add-comment request (`POST /tasks/:id/comments`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    /// The comment text (non-empty after trimming).
    pub body: String,
}

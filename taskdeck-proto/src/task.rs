//! Task model: workflow status, priority, the task record itself, and
//! the draft payload used to create one.
//!
//! Wire forms follow the server's JSON: camelCase field names,
//! SCREAMING_SNAKE_CASE enum values, ISO-8601 instants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::user::User;

/// Workflow status of a task — one column on the board.
///
/// Ordering follows column order (`Backlog` first, `Done` last), so a
/// `BTreeMap<Status, _>` iterates in display order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Not yet started.
    Backlog,
    /// Actively being worked on.
    InProgress,
    /// Awaiting review.
    Review,
    /// Finished.
    Done,
}

impl Status {
    /// All statuses in column order.
    pub const ALL: [Self; 4] = [Self::Backlog, Self::InProgress, Self::Review, Self::Done];

    /// Human-readable column title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Backlog => "Backlog",
            Self::InProgress => "In Progress",
            Self::Review => "Review",
            Self::Done => "Done",
        }
    }

    /// Wire form of this status (`BACKLOG`, `IN_PROGRESS`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Backlog => "BACKLOG",
            Self::InProgress => "IN_PROGRESS",
            Self::Review => "REVIEW",
            Self::Done => "DONE",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a [`Status`] from a string fails.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown status: {0}")]
pub struct ParseStatusError(pub String);

impl std::str::FromStr for Status {
    type Err = ParseStatusError;

    /// Accepts the wire form case-insensitively; hyphens count as
    /// underscores (`in-progress` parses as `IN_PROGRESS`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('-', "_").as_str() {
            "BACKLOG" => Ok(Self::Backlog),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "REVIEW" => Ok(Self::Review),
            "DONE" => Ok(Self::Done),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

/// Priority of a task.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    /// Low priority.
    Low,
    /// Medium priority (server default for new drafts).
    Medium,
    /// High priority.
    High,
}

impl Priority {
    /// Wire form of this priority (`LOW`, `MEDIUM`, `HIGH`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a [`Priority`] from a string fails.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown priority: {0}")]
pub struct ParsePriorityError(pub String);

impl std::str::FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            _ => Err(ParsePriorityError(s.to_string())),
        }
    }
}

/// A task as returned by the server.
///
/// `id`, `created_at`, and `badge` are server-assigned; the client never
/// computes them. `badge` is an opaque display label and may change on
/// any server response for the same task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque server-assigned identifier, immutable.
    pub id: String,
    /// Non-empty title.
    pub title: String,
    /// Non-empty description.
    pub description: String,
    /// Task priority.
    pub priority: Priority,
    /// Current workflow status.
    pub status: Status,
    /// Assigned user, if any.
    #[serde(default)]
    pub assignee: Option<User>,
    /// Absolute due instant.
    pub due_date: DateTime<Utc>,
    /// Server-computed display label; opaque to the client.
    #[serde(default)]
    pub badge: String,
    /// Server-assigned creation instant.
    pub created_at: DateTime<Utc>,
}

/// Body of the status-update request (`PUT /tasks/:id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    /// The target status.
    pub status: Status,
}

/// Errors produced by client-side draft validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    /// Title is empty or whitespace-only.
    #[error("title is required")]
    TitleEmpty,
    /// Description is empty or whitespace-only.
    #[error("description is required")]
    DescriptionEmpty,
    /// An assignee was given but its id is blank.
    #[error("assignee id cannot be blank")]
    AssigneeBlank,
}

/// Payload for creating a task (`POST /tasks`).
///
/// The server assigns `id`, `createdAt`, `badge`, and the initial
/// status. An unset assignee is transmitted as an explicit `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    /// Title (must be non-blank).
    pub title: String,
    /// Description (must be non-blank).
    pub description: String,
    /// Priority for the new task.
    pub priority: Priority,
    /// Assignee id, or `None` for unassigned.
    pub assignee_id: Option<String>,
    /// Due instant.
    pub due_date: DateTime<Utc>,
}

impl TaskDraft {
    /// Builds a draft, normalizing a blank assignee id to `None`.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
        assignee_id: Option<String>,
        due_date: DateTime<Utc>,
    ) -> Self {
        let assignee_id = assignee_id.and_then(|id| {
            let trimmed = id.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        });
        Self {
            title: title.into(),
            description: description.into(),
            priority,
            assignee_id,
            due_date,
        }
    }

    /// Validates the draft before it is sent to the server.
    ///
    /// # Errors
    ///
    /// Returns a [`DraftError`] when the title or description is blank,
    /// or when an assignee id is present but blank. Whether the assignee
    /// id refers to a known user is checked by the caller against its
    /// user set.
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.title.trim().is_empty() {
            return Err(DraftError::TitleEmpty);
        }
        if self.description.trim().is_empty() {
            return Err(DraftError::DescriptionEmpty);
        }
        if let Some(id) = &self.assignee_id {
            if id.trim().is_empty() {
                return Err(DraftError::AssigneeBlank);
            }
        }
        Ok(())
    }
}

//! User model.

use serde::{Deserialize, Serialize};

/// A board member, identified by the server and displayed by email.
///
/// Users are discovered either from the dedicated listing endpoint or
/// incidentally from task assignee payloads; the client merges both
/// sources into one set keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned identifier.
    pub id: String,
    /// Unique display key.
    pub email: String,
}

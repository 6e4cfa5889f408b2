//! Authentication payloads.

use serde::{Deserialize, Serialize};

use crate::user::User;

/// Body of the login and signup requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Response of the login and signup endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Bearer token for subsequent requests.
    pub token: String,
    /// The authenticated user.
    pub user: User,
}

//! Session holder: the bearer credential and the identity derived from it.
//!
//! Credential and identity are stored as a single value, so there is no
//! state in which they disagree. Nothing is persisted — a process always
//! starts unauthenticated.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use thiserror::Error;

/// Errors produced when installing a credential.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The credential is not a three-segment token.
    #[error("credential is not a three-segment token")]
    MalformedToken,

    /// The claims segment is not valid base64url.
    #[error("credential payload is not valid base64url: {0}")]
    PayloadEncoding(#[from] base64::DecodeError),

    /// The claims segment is not the expected JSON shape.
    #[error("credential claims are not valid JSON: {0}")]
    PayloadJson(#[from] serde_json::Error),
}

/// Identity decoded from the credential's claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Subject id (the server's user id).
    pub id: String,
    /// Account email.
    pub email: String,
}

/// Claims carried in the token payload. Extra fields are ignored.
#[derive(Deserialize)]
struct Claims {
    sub: String,
    email: String,
}

/// Holds the current credential and its derived identity.
#[derive(Debug, Default)]
pub struct Session {
    current: Option<(String, Identity)>,
}

impl Session {
    /// Creates an unauthenticated session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a credential, replacing credential and identity together.
    ///
    /// A token that does not decode is rejected and the previous session
    /// state is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the token is not JWT-shaped or its
    /// claims cannot be decoded.
    pub fn log_in(&mut self, token: String) -> Result<Identity, SessionError> {
        let identity = decode_identity(&token)?;
        self.current = Some((token, identity.clone()));
        Ok(identity)
    }

    /// Ends the session, clearing credential and identity.
    ///
    /// Components caching server data must discard it on this transition.
    pub fn log_out(&mut self) {
        self.current = None;
    }

    /// The current bearer token, if authenticated.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|(token, _)| token.as_str())
    }

    /// The identity derived from the current credential, if any.
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.current.as_ref().map(|(_, identity)| identity)
    }

    /// Whether a credential is currently installed.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }
}

/// Decodes the claims segment of a JWT-shaped token into an [`Identity`].
///
/// The signature is not verified — the server is the authority; the
/// client only needs the subject id and email for display.
pub(crate) fn decode_identity(token: &str) -> Result<Identity, SessionError> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(SessionError::MalformedToken);
    };
    let bytes = URL_SAFE_NO_PAD.decode(payload)?;
    let claims: Claims = serde_json::from_slice(&bytes)?;
    Ok(Identity {
        id: claims.sub,
        email: claims.email,
    })
}

//! Error taxonomy for the backend-facing operations.
//!
//! Anything touching account security (sign-in, sign-up, sign-out) is
//! surfaced to the caller. Profile and text-generation failures are caught by
//! the page controllers and degraded to safe defaults.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity service unreachable: {0}")]
    Network(String),

    /// The provider answered with an error code (EMAIL_EXISTS, WEAK_PASSWORD, ...).
    #[error("identity service rejected the request: {code}")]
    Rejected { code: String },

    #[error("no signed-in identity")]
    NoSession,

    #[error("malformed identity response: {0}")]
    Malformed(String),

    #[error("failed to persist session: {0}")]
    Persist(String),

    #[error("identity service not configured: {0}")]
    NotConfigured(&'static str),
}

impl From<reqwest::Error> for IdentityError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            IdentityError::Malformed(e.to_string())
        } else {
            IdentityError::Network(e.to_string())
        }
    }
}

/// Profile document failures. `Read` and `Write` are kept apart because the
/// bootstrap and settings flows react to them differently.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read profile {uid}: {reason}")]
    Read { uid: String, reason: String },

    #[error("failed to write profile {uid}: {reason}")]
    Write { uid: String, reason: String },
}

impl ProfileError {
    pub fn read(uid: &str, reason: impl std::fmt::Display) -> Self {
        ProfileError::Read { uid: uid.to_string(), reason: reason.to_string() }
    }

    pub fn write(uid: &str, reason: impl std::fmt::Display) -> Self {
        ProfileError::Write { uid: uid.to_string(), reason: reason.to_string() }
    }
}

#[derive(Debug, Error)]
pub enum GenerationUnavailable {
    #[error("API key not configured")]
    MissingKey,

    #[error("text service unreachable: {0}")]
    Network(String),

    #[error("malformed generation response: {0}")]
    Malformed(String),

    #[error("empty response")]
    Empty,
}

impl From<reqwest::Error> for GenerationUnavailable {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            GenerationUnavailable::Malformed(e.to_string())
        } else {
            GenerationUnavailable::Network(e.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum AccountCreationError {
    #[error("could not create identity: {0}")]
    Identity(#[from] IdentityError),

    /// The identity exists but its profile document does not. The next
    /// bootstrap run creates the missing document.
    #[error("identity created but profile write failed: {0}")]
    Profile(#[from] ProfileError),
}

#[derive(Debug, Error)]
#[error("sign-out failed: {0}")]
pub struct SignOutError(#[from] pub IdentityError);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_error_display_names_uid() {
        let e = ProfileError::read("abc123", "HTTP 500");
        assert_eq!(e.to_string(), "failed to read profile abc123: HTTP 500");
        let e = ProfileError::write("abc123", "denied");
        assert!(matches!(e, ProfileError::Write { .. }));
    }

    #[test]
    fn test_account_creation_wraps_identity() {
        let e: AccountCreationError = IdentityError::Rejected { code: "EMAIL_EXISTS".into() }.into();
        assert!(e.to_string().contains("EMAIL_EXISTS"));
    }
}

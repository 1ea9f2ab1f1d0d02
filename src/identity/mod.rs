pub mod firebase;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::IdentityError;

pub use firebase::FirebaseAuth;

/// Opaque handle for a signed-in identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub uid: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub metadata: UserMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub creation_time: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
            display_name: None,
            photo_url: None,
            metadata: UserMetadata::default(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

/// The hosted authentication provider.
///
/// Every sign-in, sign-up and sign-out is broadcast to [`subscribe`]rs as the
/// new identity (or `None`). Receivers start with the current value already
/// marked seen, so callers read it with `borrow()` before awaiting `changed()`.
///
/// [`subscribe`]: IdentityGateway::subscribe
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    fn subscribe(&self) -> watch::Receiver<Option<User>>;

    fn current_user(&self) -> Option<User>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, IdentityError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<User, IdentityError>;

    async fn sign_out(&self) -> Result<(), IdentityError>;

    async fn update_display_name(&self, user: &User, name: &str) -> Result<(), IdentityError>;
}

/// Supplies the bearer token the document store forwards on each request.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn id_token(&self) -> Result<Option<String>, IdentityError>;
}

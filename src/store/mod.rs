pub mod firestore;
pub mod value;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::ProfileError;

pub use firestore::FirestoreStore;

pub const USERS_COLLECTION: &str = "users";
pub const DEFAULT_MOOD: &str = "neutral";
pub const MEMBER_ROLE: &str = "member";
pub const ADMIN_ROLE: &str = "admin";

/// A complete profile, as written when a document is first created.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub username: String,
    pub avatar_url: Option<String>,
    pub preferred_mood: String,
    pub created_at: DateTime<Utc>,
    pub roles: Vec<String>,
}

impl UserProfile {
    /// Defaults for a fresh account: no avatar, neutral mood, member role.
    pub fn new_member(username: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            username: username.into(),
            avatar_url: None,
            preferred_mood: DEFAULT_MOOD.to_string(),
            created_at,
            roles: vec![MEMBER_ROLE.to_string()],
        }
    }
}

/// A profile as read back from the store. Older documents may lack any field,
/// so everything is optional and callers pick their own fallbacks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileDocument {
    pub username: Option<String>,
    pub avatar_url: Option<String>,
    pub preferred_mood: Option<String>,
    /// First of `createdAt`, `created_at`, `created` present in the document.
    pub created_at: Option<DateTime<Utc>>,
    pub roles: Option<Vec<String>>,
}

impl From<UserProfile> for ProfileDocument {
    fn from(p: UserProfile) -> Self {
        Self {
            username: Some(p.username),
            avatar_url: p.avatar_url,
            preferred_mood: Some(p.preferred_mood),
            created_at: Some(p.created_at),
            roles: Some(p.roles),
        }
    }
}

/// The fields the settings editor may change.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    pub username: String,
    pub preferred_mood: String,
}

/// Per-user profile documents, keyed by identity uid.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// `Ok(None)` when no document exists for `uid`.
    async fn get_profile(&self, uid: &str) -> Result<Option<ProfileDocument>, ProfileError>;

    /// Create or overwrite the whole document.
    async fn set_profile(&self, uid: &str, profile: &UserProfile) -> Result<(), ProfileError>;

    /// Merge `update` into an existing document. Fails if the document is absent.
    async fn update_profile(&self, uid: &str, update: &ProfileUpdate) -> Result<(), ProfileError>;
}

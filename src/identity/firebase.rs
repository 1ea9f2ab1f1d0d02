//! Identity gateway backed by the Firebase Identity Toolkit REST API.
//!
//! Email/password accounts only. The signed-in session (user handle plus
//! id/refresh tokens) is written to `session.json` so the next process starts
//! signed in, the way the web SDK restores from browser storage.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use super::{IdentityGateway, TokenSource, User, UserMetadata};
use crate::config::Config;
use crate::error::IdentityError;

/// Refresh this long before the provider's stated expiry.
const EXPIRY_SLACK_SECS: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Credentials {
    user: User,
    id_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    local_id: String,
    id_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<AccountInfo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountInfo {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    photo_url: Option<String>,
    /// Milliseconds since the epoch, as a string.
    #[serde(default)]
    created_at: Option<String>,
}

#[derive(Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl ErrorBody {
    /// "WEAK_PASSWORD : Password should be at least 6 characters" -> "WEAK_PASSWORD"
    fn code(&self) -> String {
        self.message
            .split_whitespace()
            .next()
            .unwrap_or("UNKNOWN")
            .to_string()
    }
}

pub struct FirebaseAuth {
    client: reqwest::Client,
    api_key: String,
    identity_url: String,
    token_url: String,
    session_path: PathBuf,
    credentials: Mutex<Option<Credentials>>,
    state: watch::Sender<Option<User>>,
}

impl FirebaseAuth {
    /// Build the gateway and restore any session saved at `session_path`.
    pub fn open(cfg: &Config, session_path: PathBuf) -> Result<Self, IdentityError> {
        let api_key = cfg
            .firebase_api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(IdentityError::NotConfigured("firebase_api_key"))?;

        let restored = load_session(&session_path);
        if let Some(ref c) = restored {
            tracing::debug!("Restored session for {}", c.user.uid);
        }
        let (state, _) = watch::channel(restored.as_ref().map(|c| c.user.clone()));

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            identity_url: cfg.identity_url.trim_end_matches('/').to_string(),
            token_url: cfg.token_url.trim_end_matches('/').to_string(),
            session_path,
            credentials: Mutex::new(restored),
            state,
        })
    }

    async fn post<T: DeserializeOwned>(
        &self,
        base: &str,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T, IdentityError> {
        let resp = self
            .client
            .post(format!("{base}/{path}"))
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let code = match resp.json::<ErrorEnvelope>().await {
                Ok(env) => env.error.code(),
                Err(_) => format!("HTTP {status}"),
            };
            return Err(IdentityError::Rejected { code });
        }

        Ok(resp.json().await?)
    }

    /// Exchange a fresh token response for full credentials and broadcast the
    /// new identity.
    async fn establish(&self, token: TokenResponse) -> Result<User, IdentityError> {
        let mut user = User {
            uid: token.local_id.clone(),
            email: token.email.clone(),
            display_name: token.display_name.clone().filter(|n| !n.is_empty()),
            photo_url: None,
            metadata: UserMetadata::default(),
        };

        // Lookup fills in photo URL and creation time; a failure here still
        // leaves a usable session.
        match self.lookup(&token.id_token).await {
            Ok(Some(info)) if info.local_id == user.uid => merge_account_info(&mut user, info),
            Ok(_) => tracing::warn!("Account lookup returned no record for {}", user.uid),
            Err(e) => tracing::warn!("Account lookup failed for {}: {e}", user.uid),
        }

        let creds = Credentials {
            user: user.clone(),
            id_token: token.id_token,
            refresh_token: token.refresh_token,
            expires_at: expiry_from(token.expires_in.as_deref()),
        };
        save_session(&self.session_path, &creds)?;
        self.set_credentials(Some(creds));
        self.state.send_replace(Some(user.clone()));
        Ok(user)
    }

    async fn lookup(&self, id_token: &str) -> Result<Option<AccountInfo>, IdentityError> {
        let resp: LookupResponse = self
            .post(
                &self.identity_url,
                "accounts:lookup",
                serde_json::json!({ "idToken": id_token }),
            )
            .await?;
        Ok(resp.users.into_iter().next())
    }

    fn snapshot(&self) -> Option<Credentials> {
        self.credentials.lock().map(|c| c.clone()).unwrap_or(None)
    }

    fn set_credentials(&self, creds: Option<Credentials>) {
        if let Ok(mut guard) = self.credentials.lock() {
            *guard = creds;
        }
    }

    async fn refresh(&self, creds: Credentials) -> Result<String, IdentityError> {
        tracing::debug!("Refreshing id token for {}", creds.user.uid);
        let resp: RefreshResponse = self
            .post(
                &self.token_url,
                "token",
                serde_json::json!({
                    "grant_type": "refresh_token",
                    "refresh_token": creds.refresh_token,
                }),
            )
            .await?;

        let refreshed = Credentials {
            id_token: resp.id_token.clone(),
            refresh_token: resp.refresh_token,
            expires_at: expiry_from(resp.expires_in.as_deref()),
            ..creds
        };
        if let Err(e) = save_session(&self.session_path, &refreshed) {
            tracing::warn!("Could not persist refreshed session: {e}");
        }
        self.set_credentials(Some(refreshed));
        Ok(resp.id_token)
    }
}

#[async_trait]
impl IdentityGateway for FirebaseAuth {
    fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.state.subscribe()
    }

    fn current_user(&self) -> Option<User> {
        self.snapshot().map(|c| c.user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, IdentityError> {
        let token: TokenResponse = self
            .post(
                &self.identity_url,
                "accounts:signInWithPassword",
                serde_json::json!({
                    "email": email,
                    "password": password,
                    "returnSecureToken": true,
                }),
            )
            .await?;
        let user = self.establish(token).await?;
        tracing::info!("Signed in as {}", user.email.as_deref().unwrap_or(&user.uid));
        Ok(user)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<User, IdentityError> {
        let token: TokenResponse = self
            .post(
                &self.identity_url,
                "accounts:signUp",
                serde_json::json!({
                    "email": email,
                    "password": password,
                    "returnSecureToken": true,
                }),
            )
            .await?;
        self.establish(token).await
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        match std::fs::remove_file(&self.session_path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(IdentityError::Persist(e.to_string())),
        }
        self.set_credentials(None);
        self.state.send_replace(None);
        Ok(())
    }

    async fn update_display_name(&self, user: &User, name: &str) -> Result<(), IdentityError> {
        let creds = self.snapshot().ok_or(IdentityError::NoSession)?;
        if creds.user.uid != user.uid {
            return Err(IdentityError::NoSession);
        }
        let id_token = self.id_token().await?.ok_or(IdentityError::NoSession)?;

        let _: serde_json::Value = self
            .post(
                &self.identity_url,
                "accounts:update",
                serde_json::json!({
                    "idToken": id_token,
                    "displayName": name,
                    "returnSecureToken": false,
                }),
            )
            .await?;

        if let Some(mut creds) = self.snapshot() {
            creds.user.display_name = Some(name.to_string());
            if let Err(e) = save_session(&self.session_path, &creds) {
                tracing::warn!("Could not persist display name change: {e}");
            }
            self.set_credentials(Some(creds));
        }
        Ok(())
    }
}

#[async_trait]
impl TokenSource for FirebaseAuth {
    async fn id_token(&self) -> Result<Option<String>, IdentityError> {
        let Some(creds) = self.snapshot() else {
            return Ok(None);
        };
        if creds.expires_at - Duration::seconds(EXPIRY_SLACK_SECS) > Utc::now() {
            return Ok(Some(creds.id_token));
        }
        self.refresh(creds).await.map(Some)
    }
}

fn merge_account_info(user: &mut User, info: AccountInfo) {
    if info.email.is_some() {
        user.email = info.email;
    }
    if let Some(name) = info.display_name.filter(|n| !n.is_empty()) {
        user.display_name = Some(name);
    }
    user.photo_url = info.photo_url.filter(|u| !u.is_empty());
    user.metadata.creation_time = info
        .created_at
        .and_then(|ms| ms.parse::<i64>().ok())
        .and_then(DateTime::from_timestamp_millis);
}

fn expiry_from(expires_in: Option<&str>) -> DateTime<Utc> {
    let secs = expires_in.and_then(|s| s.parse::<i64>().ok()).unwrap_or(3600);
    Utc::now() + Duration::seconds(secs)
}

fn load_session(path: &Path) -> Option<Credentials> {
    let contents = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&contents) {
        Ok(creds) => Some(creds),
        Err(e) => {
            tracing::warn!("Ignoring unreadable session at {}: {e}", path.display());
            None
        }
    }
}

fn save_session(path: &Path, creds: &Credentials) -> Result<(), IdentityError> {
    let persist = |e: &dyn std::fmt::Display| IdentityError::Persist(e.to_string());
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| persist(&e))?;
    }
    let contents = serde_json::to_string_pretty(creds).map_err(|e| persist(&e))?;
    std::fs::write(path, contents).map_err(|e| persist(&e))?;

    // Session holds a refresh token; owner-only.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .map_err(|e| persist(&e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_strips_description() {
        let body = ErrorBody { message: "WEAK_PASSWORD : Password should be at least 6 characters".into() };
        assert_eq!(body.code(), "WEAK_PASSWORD");
        let body = ErrorBody { message: "EMAIL_EXISTS".into() };
        assert_eq!(body.code(), "EMAIL_EXISTS");
    }

    #[test]
    fn test_merge_account_info_parses_creation_millis() {
        let mut user = User::new("u1");
        merge_account_info(
            &mut user,
            AccountInfo {
                local_id: "u1".into(),
                email: Some("a@b.co".into()),
                display_name: Some(String::new()),
                photo_url: Some("https://img/x.png".into()),
                created_at: Some("1700000000000".into()),
            },
        );
        assert_eq!(user.email.as_deref(), Some("a@b.co"));
        assert_eq!(user.display_name, None);
        assert_eq!(user.photo_url.as_deref(), Some("https://img/x.png"));
        assert_eq!(user.metadata.creation_time.unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_session_file_roundtrip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("session.json");
        let creds = Credentials {
            user: User::new("u9").with_email("x@y.z"),
            id_token: "id".into(),
            refresh_token: "refresh".into(),
            expires_at: Utc::now(),
        };
        save_session(&path, &creds).unwrap();
        let loaded = load_session(&path).unwrap();
        assert_eq!(loaded.user, creds.user);
        assert_eq!(loaded.refresh_token, "refresh");
    }

    #[test]
    fn test_corrupt_session_is_ignored() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(load_session(&path).is_none());
    }
}

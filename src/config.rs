use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Hosted identity + document store
    #[serde(default)]
    pub firebase_api_key: Option<String>,

    #[serde(default = "default_project_id")]
    pub firebase_project_id: String,

    #[serde(default = "default_identity_url")]
    pub identity_url: String,

    #[serde(default = "default_token_url")]
    pub token_url: String,

    #[serde(default = "default_firestore_url")]
    pub firestore_url: String,

    // Text generation (optional)
    #[serde(default)]
    pub gemini_api_key: Option<String>,

    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    #[serde(default = "default_gemini_url")]
    pub gemini_url: String,

    /// Where a signed-in visitor to the login/signup page is sent.
    #[serde(default = "default_auth_landing")]
    pub auth_landing: String,

    /// Where an anonymous visitor to a protected page is sent.
    #[serde(default = "default_unauthenticated_landing")]
    pub unauthenticated_landing: String,
}

fn default_project_id() -> String {
    "spark-youth-67d89".to_string()
}

fn default_identity_url() -> String {
    "https://identitytoolkit.googleapis.com/v1".to_string()
}

fn default_token_url() -> String {
    "https://securetoken.googleapis.com/v1".to_string()
}

fn default_firestore_url() -> String {
    "https://firestore.googleapis.com/v1".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_gemini_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_auth_landing() -> String {
    "home.html".to_string()
}

fn default_unauthenticated_landing() -> String {
    "auth.html".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            firebase_api_key: None,
            firebase_project_id: default_project_id(),
            identity_url: default_identity_url(),
            token_url: default_token_url(),
            firestore_url: default_firestore_url(),
            gemini_api_key: None,
            gemini_model: default_gemini_model(),
            gemini_url: default_gemini_url(),
            auth_landing: default_auth_landing(),
            unauthenticated_landing: default_unauthenticated_landing(),
        }
    }
}

impl Config {
    pub fn data_dir() -> Result<PathBuf> {
        let dir = dirs::home_dir()
            .context("Could not determine home directory")?
            .join(".spark-youth");
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("config.toml"))
    }

    pub fn session_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("session.json"))
    }

    pub fn local_storage_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("local_storage.json"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(contents).context("Failed to parse config.toml")?;
        cfg.validate_endpoints()?;
        Ok(cfg)
    }

    fn validate_endpoints(&self) -> Result<()> {
        for (name, value) in [
            ("identity_url", &self.identity_url),
            ("token_url", &self.token_url),
            ("firestore_url", &self.firestore_url),
            ("gemini_url", &self.gemini_url),
        ] {
            let parsed: url::Url = value
                .parse()
                .with_context(|| format!("{name} is not a valid URL: {value}"))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                anyhow::bail!("{name} must be http(s), got {value}");
            }
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, &contents)?;

        // Owner-only: holds API keys
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        self.firebase_api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg = Config::parse("").unwrap();
        assert_eq!(cfg.auth_landing, "home.html");
        assert_eq!(cfg.unauthenticated_landing, "auth.html");
        assert_eq!(cfg.gemini_model, "gemini-2.5-flash");
        assert!(!cfg.is_configured());
    }

    #[test]
    fn test_partial_config_overrides() {
        let cfg = Config::parse(
            r#"
            firebase_api_key = "abc"
            unauthenticated_landing = "login.html"
            "#,
        )
        .unwrap();
        assert!(cfg.is_configured());
        assert_eq!(cfg.unauthenticated_landing, "login.html");
        assert_eq!(cfg.firebase_project_id, "spark-youth-67d89");
    }

    #[test]
    fn test_bad_endpoint_rejected() {
        assert!(Config::parse(r#"firestore_url = "not a url""#).is_err());
        assert!(Config::parse(r#"identity_url = "ftp://example.com/v1""#).is_err());
        assert!(Config::parse(r#"gemini_url = "http://127.0.0.1:9000/v1beta""#).is_ok());
    }
}

//! Skill registry credentials (`credentials.json` in the config directory)

use crate::error::{ConfigError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CREDENTIALS_FILE: &str = "credentials.json";

/// Environment variable carrying a ready-to-use access token
pub const TOKEN_ENV_VAR: &str = "VIDSKILL_SKILL_TOKEN";

/// Tokens expiring within this margin are treated as expired
const EXPIRY_MARGIN_SECS: i64 = 60;

/// OAuth client and tokens for the skill registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl SkillCredentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            refresh_token: refresh_token.into(),
            access_token: None,
            expires_at: None,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::CredentialsNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        write_private(path, content.as_bytes())?;
        tracing::debug!("Saved skill registry credentials to {}", path.display());
        Ok(())
    }

    /// Cached access token, if it is still valid at `now`
    pub fn valid_access_token(&self, now: DateTime<Utc>) -> Option<&str> {
        match (&self.access_token, self.expires_at) {
            (Some(token), Some(expires_at))
                if expires_at - Duration::seconds(EXPIRY_MARGIN_SECS) > now =>
            {
                Some(token.as_str())
            }
            _ => None,
        }
    }

    /// Remember a freshly issued access token
    pub fn store_access_token(&mut self, token: String, expires_in_secs: i64, now: DateTime<Utc>) {
        self.access_token = Some(token);
        self.expires_at = Some(now + Duration::seconds(expires_in_secs));
    }
}

/// Access token supplied through the environment, bypassing the refresh flow
pub fn token_from_env() -> Option<String> {
    std::env::var(TOKEN_ENV_VAR)
        .ok()
        .filter(|t| !t.trim().is_empty())
}

/// Write a file only the owner can read
#[cfg(unix)]
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` only applies when the file is created
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    file.write_all(content)
}

#[cfg(not(unix))]
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, content)
}

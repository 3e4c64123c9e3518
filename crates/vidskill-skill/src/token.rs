//! Access tokens for the skill registry
//!
//! A token comes from, in order: the `VIDSKILL_SKILL_TOKEN` environment
//! variable, the cached token in the credentials file, or a refresh-token
//! exchange whose result is written back to the credentials file.

use crate::client::DEFAULT_TIMEOUT;
use crate::error::{Result, SkillError};
use chrono::Utc;
use serde::Deserialize;
use std::path::PathBuf;
use tokio::sync::Mutex;
use vidskill_config::SkillCredentials;

pub const TOKEN_ENDPOINT: &str = "https://api.amazon.com/auth/o2/token";

/// Supplies bearer tokens, refreshing them when needed
pub struct TokenSource {
    state: Mutex<TokenState>,
    endpoint: String,
}

enum TokenState {
    Fixed(String),
    Refreshable {
        credentials: SkillCredentials,
        /// Where refreshed tokens are cached; `None` keeps them in memory
        path: Option<PathBuf>,
    },
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

impl TokenSource {
    /// Always hand out the same token
    pub fn fixed(token: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(TokenState::Fixed(token.into())),
            endpoint: TOKEN_ENDPOINT.to_string(),
        }
    }

    /// Refresh through the token endpoint, caching results at `path`
    pub fn refreshable(credentials: SkillCredentials, path: Option<PathBuf>) -> Self {
        Self {
            state: Mutex::new(TokenState::Refreshable { credentials, path }),
            endpoint: TOKEN_ENDPOINT.to_string(),
        }
    }

    /// Environment token if set, otherwise the credentials file at `path`
    pub fn from_environment_or_file(path: PathBuf) -> Result<Self> {
        if let Some(token) = vidskill_config::token_from_env() {
            tracing::debug!("Using skill registry token from {}", vidskill_config::TOKEN_ENV_VAR);
            return Ok(Self::fixed(token));
        }
        let credentials = SkillCredentials::load(&path)?;
        Ok(Self::refreshable(credentials, Some(path)))
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// A bearer token valid for at least the next minute
    pub async fn access_token(&self, client: &reqwest::Client) -> Result<String> {
        let mut state = self.state.lock().await;
        match &mut *state {
            TokenState::Fixed(token) => Ok(token.clone()),
            TokenState::Refreshable { credentials, path } => {
                let now = Utc::now();
                if let Some(token) = credentials.valid_access_token(now) {
                    return Ok(token.to_string());
                }

                tracing::debug!("Refreshing skill registry access token");
                let response = client
                    .post(&self.endpoint)
                    .form(&[
                        ("grant_type", "refresh_token"),
                        ("refresh_token", credentials.refresh_token.as_str()),
                        ("client_id", credentials.client_id.as_str()),
                        ("client_secret", credentials.client_secret.as_str()),
                    ])
                    .timeout(DEFAULT_TIMEOUT)
                    .send()
                    .await
                    .map_err(|e| {
                        if e.is_timeout() {
                            SkillError::Timeout(format!(
                                "{} after {:?}",
                                self.endpoint, DEFAULT_TIMEOUT
                            ))
                        } else {
                            SkillError::Http(e)
                        }
                    })?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(SkillError::TokenExchangeFailed(format!("{}: {}", status, body)));
                }

                let body = response.text().await?;
                let token: TokenResponse = serde_json::from_str(&body)
                    .map_err(|e| SkillError::InvalidResponse(format!("token response: {}", e)))?;

                credentials.store_access_token(token.access_token.clone(), token.expires_in, now);
                if let Some(path) = path {
                    credentials.save(path)?;
                }

                Ok(token.access_token)
            }
        }
    }
}

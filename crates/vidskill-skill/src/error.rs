//! Skill registry error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkillError {
    #[error("Skill registry returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Skill registry request timed out: {0}")]
    Timeout(String),

    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    #[error("Unparseable response from skill registry: {0}")]
    InvalidResponse(String),

    #[error("Invalid manifest template: {0}")]
    InvalidManifest(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] vidskill_config::ConfigError),
}

impl From<SkillError> for vidskill_cloud::CloudError {
    fn from(err: SkillError) -> Self {
        match err {
            SkillError::ApiError { status: 404, message } => {
                vidskill_cloud::CloudError::ResourceNotFound(message)
            }
            SkillError::Timeout(message) => vidskill_cloud::CloudError::Timeout(message),
            SkillError::InvalidResponse(message) => {
                vidskill_cloud::CloudError::InvalidResponse(message)
            }
            SkillError::TokenExchangeFailed(message) => {
                vidskill_cloud::CloudError::AuthenticationFailed(message)
            }
            other => vidskill_cloud::CloudError::api("skillRegistry", other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, SkillError>;

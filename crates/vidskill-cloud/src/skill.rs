//! Skill registry records

use serde::{Deserialize, Serialize};

/// Skill stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillStage {
    Development,
    Live,
}

impl SkillStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillStage::Development => "development",
            SkillStage::Live => "live",
        }
    }
}

impl std::fmt::Display for SkillStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of the last manifest request processed by the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillBuildStatus {
    InProgress,
    Succeeded,
    Failed(String),
}

impl SkillBuildStatus {
    /// Parse the registry status plus the collected error messages
    pub fn from_registry(status: &str, errors: &[String]) -> Self {
        match status {
            "IN_PROGRESS" => SkillBuildStatus::InProgress,
            "SUCCEEDED" => SkillBuildStatus::Succeeded,
            other if errors.is_empty() => SkillBuildStatus::Failed(other.to_string()),
            other => SkillBuildStatus::Failed(format!("{}: {}", other, errors.join("; "))),
        }
    }
}

/// Account-linking configuration pushed to the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountLinking {
    #[serde(rename = "type")]
    pub link_type: String,
    pub authorization_url: String,
    pub access_token_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub access_token_scheme: String,
    pub scopes: Vec<String>,
    pub domains: Vec<String>,
    pub default_token_expiration_in_seconds: u32,
}

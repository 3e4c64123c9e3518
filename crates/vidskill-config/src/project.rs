//! Per-project configuration (`vidskill.json`)

use crate::error::{ConfigError, Result};
use crate::region::DeployRegion;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const PROJECT_CONFIG_FILE: &str = "vidskill.json";

const DEFAULT_MIGRATION_TIMEOUT_SECS: u64 = 60 * 60;

/// Project configuration read by every command except `init`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    pub project_name: String,
    pub region: DeployRegion,
    /// Profile in the shared AWS credentials file; default chain when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_profile: Option<String>,
    pub country: String,
    pub locales: Vec<String>,
    /// Skill registry vendor id
    pub vendor_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_name: Option<String>,
    /// Base URL the demo media catalog is downloaded from
    pub content_base_url: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default = "default_migration_timeout")]
    pub migration_timeout_secs: u64,
}

fn default_migration_timeout() -> u64 {
    DEFAULT_MIGRATION_TIMEOUT_SECS
}

/// Locations of templates and artifacts, relative to the project root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PathsConfig {
    pub artifact_template: PathBuf,
    pub lambda_template: PathBuf,
    pub skill_manifest: PathBuf,
    pub lambda_bundle: PathBuf,
    pub lambda_build_command: Option<String>,
    pub web_player_dir: PathBuf,
    pub web_player_build_command: Option<String>,
    pub content_cache_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            artifact_template: PathBuf::from("infrastructure/artifact-stack.yaml"),
            lambda_template: PathBuf::from("infrastructure/lambda-stack.yaml"),
            skill_manifest: PathBuf::from("infrastructure/skill-manifest.json"),
            lambda_bundle: PathBuf::from("lambda/dist/lambda.zip"),
            lambda_build_command: Some("npm run build --prefix lambda".to_string()),
            web_player_dir: PathBuf::from("web-player/dist"),
            web_player_build_command: Some("npm run build --prefix web-player".to_string()),
            content_cache_dir: PathBuf::from(".vidskill/content"),
        }
    }
}

impl ProjectConfig {
    /// Load and validate a project config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ProjectConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        tracing::debug!("Loaded project config from {}", path.display());
        Ok(config)
    }

    /// Write the config as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        validate_project_name(&self.project_name)?;
        validate_country(&self.country)?;
        if self.locales.is_empty() {
            return Err(ConfigError::Invalid("at least one locale is required".to_string()));
        }
        for locale in &self.locales {
            validate_locale(locale)?;
        }
        if self.vendor_id.trim().is_empty() {
            return Err(ConfigError::Invalid("vendorId must not be empty".to_string()));
        }
        if !self.content_base_url.starts_with("https://")
            && !self.content_base_url.starts_with("http://")
        {
            return Err(ConfigError::Invalid(format!(
                "contentBaseUrl must be an http(s) URL: {}",
                self.content_base_url
            )));
        }
        Ok(())
    }

    /// Display name of the skill
    pub fn skill_name(&self) -> &str {
        self.skill_name.as_deref().unwrap_or(&self.project_name)
    }

    /// Name of the storage/hosting stack
    pub fn artifact_stack_name(&self) -> String {
        format!("{}-artifact-stack", self.project_name)
    }

    /// Name of the compute/identity stack
    pub fn lambda_stack_name(&self) -> String {
        format!("{}-lambda-stack", self.project_name)
    }
}

/// Project names end up in stack, bucket and domain names
pub fn validate_project_name(name: &str) -> Result<()> {
    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if name.len() < 3 || name.len() > 20 || !valid_chars || name.starts_with('-') {
        return Err(ConfigError::Invalid(format!(
            "project name '{}' must be 3-20 characters of lowercase letters, digits and '-'",
            name
        )));
    }
    Ok(())
}

/// Locales look like `en-US`
pub fn validate_locale(locale: &str) -> Result<()> {
    let mut parts = locale.split('-');
    let language = parts.next().unwrap_or_default();
    let region = parts.next().unwrap_or_default();
    let valid = parts.next().is_none()
        && language.len() == 2
        && language.chars().all(|c| c.is_ascii_lowercase())
        && region.len() == 2
        && region.chars().all(|c| c.is_ascii_uppercase());
    if !valid {
        return Err(ConfigError::Invalid(format!(
            "locale '{}' must look like en-US",
            locale
        )));
    }
    Ok(())
}

/// Countries are two-letter uppercase codes
pub fn validate_country(country: &str) -> Result<()> {
    if country.len() != 2 || !country.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(ConfigError::Invalid(format!(
            "country '{}' must be a two-letter code such as US",
            country
        )));
    }
    Ok(())
}

pub mod credentials;
pub mod error;
pub mod project;
pub mod region;

pub use credentials::{CREDENTIALS_FILE, SkillCredentials, TOKEN_ENV_VAR, token_from_env};
pub use error::*;
pub use project::{PROJECT_CONFIG_FILE, PathsConfig, ProjectConfig};
pub use region::DeployRegion;

use std::path::{Path, PathBuf};

/// Environment variable pointing directly at a project config file
pub const CONFIG_PATH_ENV_VAR: &str = "VIDSKILL_CONFIG_PATH";

/// Get the VidSkill config directory, creating it if needed
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("vidskill");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

/// Path of the skill registry credentials file
pub fn credentials_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CREDENTIALS_FILE))
}

/// Find the project's `vidskill.json`
///
/// Search order:
/// 1. `VIDSKILL_CONFIG_PATH` (direct path)
/// 2. the current directory, then each parent directory
pub fn find_project_config() -> Result<PathBuf> {
    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV_VAR) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(path);
        }
    }

    let current_dir = std::env::current_dir()?;
    find_project_config_from(&current_dir)
}

/// Walk up from `start` looking for `vidskill.json`
pub fn find_project_config_from(start: &Path) -> Result<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(PROJECT_CONFIG_FILE))
        .find(|path| path.is_file())
        .ok_or(ConfigError::ProjectConfigNotFound)
}

/// Load the project config, returning it together with the project root
pub fn load_project() -> Result<(ProjectConfig, PathBuf)> {
    let path = find_project_config()?;
    let root = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let config = ProjectConfig::load(&path)?;
    Ok((config, root))
}

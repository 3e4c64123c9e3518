use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config directory not found")]
    ConfigDirNotFound,

    #[error(
        "Project config not found. Looked for:\n\
        - vidskill.json in the current directory and its parents\n\
        - the path in the VIDSKILL_CONFIG_PATH environment variable\n\
        Run `vidskill init` to create one"
    )]
    ProjectConfigNotFound,

    #[error("Skill registry credentials not found at {0}. Run `vidskill init` first")]
    CredentialsNotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Unsupported region '{0}'. Supported regions: us-east-1, eu-west-1, us-west-2")]
    UnsupportedRegion(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use vidskill_cloud::CloudError;
use vidskill_config::ConfigError;
use vidskill_skill::SkillError;

#[derive(Debug, Error)]
pub enum DeployError {
    #[error(transparent)]
    Cloud(#[from] CloudError),

    #[error(transparent)]
    Skill(#[from] SkillError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Project is already deployed: {0}")]
    AlreadyDeployed(String),

    #[error("Project is partially deployed: {0}")]
    PartiallyDeployed(String),

    #[error("Project is not deployed: {0}")]
    NotDeployed(String),

    #[error("Stack {0} failed to create and was rolled back")]
    StackRolledBack(String),

    #[error("Stack {stack} has no resource {logical_id}")]
    MissingResource { stack: String, logical_id: String },

    #[error("Template not found: {0}")]
    TemplateNotFound(PathBuf),

    #[error("Artifact not found: {0}")]
    ArtifactNotFound(PathBuf),

    #[error("Build step '{step}' failed: {message}")]
    BuildFailed { step: String, message: String },

    #[error("Skill creation failed: {0}")]
    SkillCreationFailed(String),

    #[error("Skill {skill_id} was still building after {limit:?}")]
    SkillBuildTimeout { skill_id: String, limit: Duration },

    #[error("Content migration failed: {0}")]
    MigrationFailed(String),

    #[error("Content migration did not finish within {0:?}")]
    MigrationTimeout(Duration),

    #[error("Account linking is not possible: {0}")]
    AccountLinking(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DeployError {
    /// Message shown to the operator, with a hint where one helps
    pub fn user_message(&self) -> String {
        match self {
            DeployError::AlreadyDeployed(detail) => format!(
                "{}\n\n\
                 Use `vidskill update` to change the running deployment,\n\
                 or `vidskill delete` before deploying again.",
                detail
            ),
            DeployError::PartiallyDeployed(detail) => format!(
                "A previous deployment is incomplete: {}\n\n\
                 Run `vidskill delete` to clean up, then deploy again.",
                detail
            ),
            DeployError::NotDeployed(detail) => format!(
                "{}\n\nRun `vidskill deploy` first.",
                detail
            ),
            DeployError::StackRolledBack(stack) => format!(
                "Stack {} could not be created and has been deleted again.\n\n\
                 Check the stack events in the CloudFormation console for the failing resource.",
                stack
            ),
            DeployError::TemplateNotFound(path) => format!(
                "Template not found: {}\n\n\
                 Check the `paths` section of vidskill.json.",
                path.display()
            ),
            DeployError::MigrationTimeout(limit) => format!(
                "Demo content upload did not finish within {}s.\n\n\
                 Raise `migrationTimeoutSecs` in vidskill.json or check your network connection.",
                limit.as_secs()
            ),
            DeployError::SkillBuildTimeout { skill_id, limit } => format!(
                "Skill {} was still building after {}s.\n\n\
                 Check its build status in the developer console, then run `vidskill skill` again.",
                skill_id,
                limit.as_secs()
            ),
            _ => format!("{}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, DeployError>;

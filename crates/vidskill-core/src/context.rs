//! Everything a workflow needs for one run

use crate::error::{DeployError, Result};
use crate::migration::ContentFetcher;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use vidskill_cloud::Providers;
use vidskill_config::ProjectConfig;

const DEFAULT_SKILL_POLL_INTERVAL: Duration = Duration::from_secs(5);
const DEFAULT_SKILL_BUILD_TIMEOUT: Duration = Duration::from_secs(600);

/// Read-only context shared by the workflows of one command
#[derive(Clone)]
pub struct DeployContext {
    pub project: ProjectConfig,
    /// Directory holding `vidskill.json`; relative paths resolve against it
    pub root: PathBuf,
    pub providers: Providers,
    pub fetcher: Arc<dyn ContentFetcher>,
    pub skill_poll_interval: Duration,
    /// Longest a skill build may stay in progress
    pub skill_build_timeout: Duration,
}

impl DeployContext {
    pub fn new(
        project: ProjectConfig,
        root: PathBuf,
        providers: Providers,
        fetcher: Arc<dyn ContentFetcher>,
    ) -> Self {
        Self {
            project,
            root,
            providers,
            fetcher,
            skill_poll_interval: DEFAULT_SKILL_POLL_INTERVAL,
            skill_build_timeout: DEFAULT_SKILL_BUILD_TIMEOUT,
        }
    }

    pub fn with_skill_poll_interval(mut self, interval: Duration) -> Self {
        self.skill_poll_interval = interval;
        self
    }

    pub fn with_skill_build_timeout(mut self, timeout: Duration) -> Self {
        self.skill_build_timeout = timeout;
        self
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    /// Read a template or manifest file relative to the project root
    pub async fn read_template(&self, path: &Path) -> Result<String> {
        let full = self.resolve(path);
        match tokio::fs::read_to_string(&full).await {
            Ok(body) => Ok(body),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(DeployError::TemplateNotFound(full))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn migration_timeout(&self) -> Duration {
        Duration::from_secs(self.project.migration_timeout_secs)
    }
}

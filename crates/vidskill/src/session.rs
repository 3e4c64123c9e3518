//! Wiring the real providers for one command

use anyhow::Context;
use std::sync::Arc;
use vidskill_cloud_aws::AwsCloud;
use vidskill_core::{DeployContext, HttpFetcher};
use vidskill_skill::{SkillApiClient, TokenSource};

/// Load the project and connect to AWS and the skill registry
pub async fn connect() -> anyhow::Result<DeployContext> {
    let (project, root) = vidskill_config::load_project()
        .context("could not load vidskill.json (run `vidskill init` first)")?;

    let credentials = vidskill_config::credentials_path()?;
    let tokens = TokenSource::from_environment_or_file(credentials)
        .context("skill registry credentials are missing (run `vidskill init`)")?;
    let skills = SkillApiClient::new(project.vendor_id.clone(), tokens);

    let aws = AwsCloud::connect(project.region.as_str(), project.aws_profile.as_deref()).await;
    let providers = aws.into_providers(Arc::new(skills));

    tracing::debug!(
        "Project {} in {} ({})",
        project.project_name,
        project.region,
        root.display()
    );
    Ok(DeployContext::new(
        project,
        root,
        providers,
        Arc::new(HttpFetcher::new()),
    ))
}

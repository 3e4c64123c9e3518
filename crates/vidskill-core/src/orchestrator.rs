//! Top-level deploy, update, delete, status and skill flows

use crate::artifacts::{build_and_upload_lambda, build_and_upload_web_player};
use crate::context::DeployContext;
use crate::engine::StackEngine;
use crate::error::{DeployError, Result};
use crate::migration::run_migration;
use crate::workflows::{ArtifactStack, LambdaStack};
use colored::Colorize;
use vidskill_cloud::StackResource;

fn step(current: usize, total: usize, message: &str) {
    println!(
        "{} {}",
        format!("[Step {}/{}]", current, total).blue().bold(),
        message
    );
}

/// Which pieces of a deployment currently exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeploymentState {
    pub artifact_stack: bool,
    pub lambda_stack: bool,
    pub skill: bool,
}

impl DeploymentState {
    pub async fn detect(ctx: &DeployContext) -> Self {
        let artifact = ArtifactStack::new(ctx);
        let artifact_stack = artifact.exists().await;
        let skill = artifact_stack && artifact.skill_id().await.is_some();
        Self {
            artifact_stack,
            lambda_stack: LambdaStack::new(ctx).exists().await,
            skill,
        }
    }

    fn present(&self) -> Vec<&'static str> {
        [
            (self.artifact_stack, "artifact stack"),
            (self.lambda_stack, "lambda stack"),
            (self.skill, "skill"),
        ]
        .into_iter()
        .filter_map(|(exists, name)| exists.then_some(name))
        .collect()
    }
}

/// Only a project with nothing deployed may be deployed
pub fn check_redeploy(state: &DeploymentState) -> Result<()> {
    let present = state.present();
    match present.len() {
        0 => Ok(()),
        3 => Err(DeployError::AlreadyDeployed(
            "artifact stack, lambda stack and skill all exist".to_string(),
        )),
        _ => Err(DeployError::PartiallyDeployed(format!(
            "only {} exist{}",
            present.join(" and "),
            if present.len() == 1 { "s" } else { "" }
        ))),
    }
}

/// Full deployment from scratch
pub async fn deploy(ctx: &DeployContext) -> Result<StatusReport> {
    const STEPS: usize = 7;
    let artifact = ArtifactStack::new(ctx);
    let lambda = LambdaStack::new(ctx);

    step(1, STEPS, "Checking for an existing deployment");
    check_redeploy(&DeploymentState::detect(ctx).await)?;

    step(2, STEPS, &format!("Creating {}", artifact.name()));
    artifact.create().await?;
    let bucket = artifact.bucket_name().await?;

    step(3, STEPS, "Starting demo content migration");
    let migration = run_migration(ctx, &bucket).await?;

    step(4, STEPS, "Building and uploading the lambda bundle");
    build_and_upload_lambda(ctx, &bucket).await?;

    step(5, STEPS, "Building and uploading the web player");
    build_and_upload_web_player(ctx, &bucket).await?;

    step(6, STEPS, &format!("Creating {} and the skill", lambda.name()));
    lambda.create().await?;

    step(7, STEPS, "Waiting for demo content migration");
    migration.wait(ctx.migration_timeout()).await?;

    Ok(status(ctx).await)
}

/// Tear the deployment down; the lambda stack goes first
pub async fn delete(ctx: &DeployContext) -> Result<()> {
    let lambda = LambdaStack::new(ctx);
    let artifact = ArtifactStack::new(ctx);

    step(1, 2, &format!("Deleting {} and the skill", lambda.name()));
    lambda.delete().await?;

    step(2, 2, &format!("Deleting {}", artifact.name()));
    artifact.delete().await?;
    Ok(())
}

/// What `update` refreshes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateTarget {
    /// Rebuild the bundle and push it into the running function
    Lambda,
    WebPlayer,
    /// Re-apply both stack templates
    Stacks,
}

pub async fn update(ctx: &DeployContext, target: UpdateTarget) -> Result<()> {
    let artifact = ArtifactStack::new(ctx);
    let lambda = LambdaStack::new(ctx);

    match target {
        UpdateTarget::Lambda => {
            let bucket = deployed_bucket(&artifact).await?;
            build_and_upload_lambda(ctx, &bucket).await?;
            match lambda.find_function_name().await {
                Some(function_name) => lambda.update_function_code(&function_name, &bucket).await?,
                None => tracing::warn!(
                    "Function of {} not found, uploaded the bundle only",
                    lambda.name()
                ),
            }
        }
        UpdateTarget::WebPlayer => {
            let bucket = deployed_bucket(&artifact).await?;
            build_and_upload_web_player(ctx, &bucket).await?;
        }
        UpdateTarget::Stacks => {
            artifact.update().await?;
            lambda.update().await?;
        }
    }
    Ok(())
}

async fn deployed_bucket(artifact: &ArtifactStack<'_>) -> Result<String> {
    artifact.find_bucket_name().await.ok_or_else(|| {
        DeployError::NotDeployed(format!("{} does not exist", artifact.name()))
    })
}

/// What `skill` does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillAction {
    UpdateManifest,
    WebPlayerLogs(bool),
}

pub async fn skill(ctx: &DeployContext, action: SkillAction) -> Result<()> {
    let lambda = LambdaStack::new(ctx);
    if !lambda.exists().await {
        return Err(DeployError::NotDeployed(format!(
            "{} does not exist",
            lambda.name()
        )));
    }

    match action {
        SkillAction::UpdateManifest => {
            let skill_id = lambda.update_skill_manifest().await?;
            tracing::info!("Manifest of skill {} updated", skill_id);
        }
        SkillAction::WebPlayerLogs(enabled) => {
            lambda.set_web_player_logging(enabled).await?;
            tracing::info!(
                "Web player logging {}",
                if enabled { "enabled" } else { "disabled" }
            );
        }
    }
    Ok(())
}

/// One stack in the status report
#[derive(Debug, Clone)]
pub struct StackReport {
    pub name: String,
    /// Provider status, `None` when the stack does not exist
    pub status: Option<String>,
    pub resources: Vec<StackResource>,
}

/// Read-only view of the deployment
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub stacks: Vec<StackReport>,
    pub skill_id: Option<String>,
}

impl StatusReport {
    pub fn is_deployed(&self) -> bool {
        self.stacks.iter().any(|s| s.status.is_some())
    }
}

pub async fn status(ctx: &DeployContext) -> StatusReport {
    let engine = StackEngine::new(ctx);
    let mut stacks = Vec::new();
    for name in [
        ctx.project.artifact_stack_name(),
        ctx.project.lambda_stack_name(),
    ] {
        let status = engine.describe(&name).await.map(|d| d.status.to_string());
        let resources = if status.is_some() {
            engine.resources(&name).await
        } else {
            Vec::new()
        };
        stacks.push(StackReport {
            name,
            status,
            resources,
        });
    }

    StatusReport {
        stacks,
        skill_id: ArtifactStack::new(ctx).skill_id().await,
    }
}

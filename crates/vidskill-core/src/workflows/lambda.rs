//! Lambda stack: the skill function, the user pool, and the skill itself
//!
//! The skill has no stack of its own. Its id lives as a tag on the artifact
//! bucket, which is what makes [`LambdaStack::ensure_skill_exists`] safe to
//! run again after a partial failure.

use crate::artifacts::lambda_artifact_key;
use crate::context::DeployContext;
use crate::engine::{CreateOutcome, DeleteOutcome, StackDefinition, StackEngine, UpdateOutcome};
use crate::error::{DeployError, Result};
use crate::workflows::artifact::ArtifactStack;
use std::collections::HashMap;
use vidskill_cloud::{
    AccountLinking, AddPermissionRequest, SkillBuildStatus, SkillStage, StackParameter,
    UpdateFunctionCodeRequest, fatal, probe,
};
use vidskill_config::DeployRegion;
use vidskill_skill::{ManifestContext, render_manifest};

pub const FUNCTION_LOGICAL_ID: &str = "SkillFunction";
pub const USER_POOL_LOGICAL_ID: &str = "UserPool";
pub const USER_POOL_CLIENT_LOGICAL_ID: &str = "UserPoolClient";

/// Environment variable read by the function to enable web player logging
pub const WEB_PLAYER_LOGGING_VAR: &str = "WEB_PLAYER_LOGGING";

const SKILL_PRINCIPAL: &str = "alexa-connectedhome.amazon.com";
const INVOKE_PERMISSION_ID: &str = "skill-invoke";

/// Account-linking redirect endpoints, one per skill registry region
const REDIRECT_URL_TEMPLATES: [&str; 3] = [
    "https://pitangui.amazon.com/api/skill/link/{vendorId}",
    "https://layla.amazon.com/api/skill/link/{vendorId}",
    "https://alexa.amazon.co.jp/api/skill/link/{vendorId}",
];
const OAUTH_SCOPES: [&str; 3] = ["openid", "email", "profile"];
const TOKEN_EXPIRATION_SECS: u32 = 3600;

pub struct LambdaStack<'a> {
    ctx: &'a DeployContext,
}

impl<'a> LambdaStack<'a> {
    pub fn new(ctx: &'a DeployContext) -> Self {
        Self { ctx }
    }

    fn artifact(&self) -> ArtifactStack<'a> {
        ArtifactStack::new(self.ctx)
    }

    pub fn name(&self) -> String {
        self.ctx.project.lambda_stack_name()
    }

    pub fn definition(&self, bucket: &str) -> StackDefinition {
        let project = &self.ctx.project;
        StackDefinition {
            name: self.name(),
            parameters: vec![
                StackParameter::new("ProjectName", &project.project_name),
                StackParameter::new("LambdaArtifactBucket", bucket),
                StackParameter::new("LambdaArtifactKey", lambda_artifact_key(&project.project_name)),
                StackParameter::new("VendorId", &project.vendor_id),
            ],
            template: project.paths.lambda_template.clone(),
        }
    }

    pub async fn exists(&self) -> bool {
        StackEngine::new(self.ctx).exists(&self.name()).await
    }

    /// Create the stack, then make sure the skill exists and is linked
    pub async fn create(&self) -> Result<String> {
        let bucket = self.artifact().bucket_name().await?;
        match StackEngine::new(self.ctx).create(&self.definition(&bucket)).await? {
            CreateOutcome::RolledBack => return Err(DeployError::StackRolledBack(self.name())),
            CreateOutcome::Created | CreateOutcome::AlreadyExists => {}
        }
        self.ensure_skill_exists().await
    }

    pub async fn update(&self) -> Result<UpdateOutcome> {
        let bucket = self.artifact().bucket_name().await?;
        StackEngine::new(self.ctx).update(&self.definition(&bucket)).await
    }

    /// Delete the skill recorded on the artifact bucket, then the stack
    pub async fn delete(&self) -> Result<DeleteOutcome> {
        let artifact = self.artifact();
        if let Some(bucket) = artifact.find_bucket_name().await
            && let Some(skill_id) = artifact.skill_id().await
        {
            fatal(
                &format!("deleteSkill {}", skill_id),
                self.ctx.providers.skills.delete_skill(&skill_id),
            )
            .await?;
            artifact.untag_skill_id(&bucket).await?;
        }
        StackEngine::new(self.ctx).delete(&self.name()).await
    }

    async fn physical_id(&self, logical_id: &str) -> Result<String> {
        let name = self.name();
        let resource = fatal(
            &format!("describeStackResource {} {}", name, logical_id),
            self.ctx
                .providers
                .stacks
                .describe_stack_resource(&name, logical_id),
        )
        .await?;
        resource.physical_id.ok_or(DeployError::MissingResource {
            stack: name,
            logical_id: logical_id.to_string(),
        })
    }

    pub async fn function_name(&self) -> Result<String> {
        self.physical_id(FUNCTION_LOGICAL_ID).await
    }

    /// Function name when the stack and function both exist
    pub async fn find_function_name(&self) -> Option<String> {
        let name = self.name();
        let function_name = probe(
            &format!("describeStackResource {} {}", name, FUNCTION_LOGICAL_ID),
            self.ctx
                .providers
                .stacks
                .describe_stack_resource(&name, FUNCTION_LOGICAL_ID),
        )
        .await
        .and_then(|r| r.physical_id)?;
        probe(
            &format!("getFunction {}", function_name),
            self.ctx.providers.functions.get_function(&function_name),
        )
        .await
        .map(|f| f.name)
    }

    /// Point the deployed function at the bundle in `bucket`
    pub async fn update_function_code(&self, function_name: &str, bucket: &str) -> Result<()> {
        let request = UpdateFunctionCodeRequest {
            function_name: function_name.to_string(),
            s3_bucket: bucket.to_string(),
            s3_key: lambda_artifact_key(&self.ctx.project.project_name),
        };
        fatal(
            &format!("updateFunctionCode {}", function_name),
            self.ctx.providers.functions.update_function_code(&request),
        )
        .await?;
        Ok(())
    }

    pub async fn set_web_player_logging(&self, enabled: bool) -> Result<()> {
        let function_name = self.function_name().await?;
        let functions = &self.ctx.providers.functions;
        let configuration = fatal(
            &format!("getFunctionConfiguration {}", function_name),
            functions.get_function_configuration(&function_name),
        )
        .await?;

        let mut environment: HashMap<String, String> = configuration.environment;
        environment.insert(WEB_PLAYER_LOGGING_VAR.to_string(), enabled.to_string());
        fatal(
            &format!("updateFunctionConfiguration {}", function_name),
            functions.update_function_configuration(&function_name, &environment),
        )
        .await?;
        Ok(())
    }

    /// Manifest for this deployment, rendered from the project template
    pub async fn render_manifest(&self, bucket: &str) -> Result<serde_json::Value> {
        let function_name = self.function_name().await?;
        let function = fatal(
            &format!("getFunction {}", function_name),
            self.ctx.providers.functions.get_function(&function_name),
        )
        .await?;

        let project = &self.ctx.project;
        let template = self.ctx.read_template(&project.paths.skill_manifest).await?;
        let context = ManifestContext::new(
            project.skill_name(),
            bucket,
            function.arn,
            project.region,
            project.country.clone(),
            project.locales.clone(),
        );
        Ok(render_manifest(&template, &context)?)
    }

    /// Create the skill unless the artifact bucket already records one
    pub async fn ensure_skill_exists(&self) -> Result<String> {
        let artifact = self.artifact();
        if let Some(skill_id) = artifact.skill_id().await {
            tracing::info!("Skill {} already exists, skipping creation", skill_id);
            return Ok(skill_id);
        }

        let bucket = artifact.bucket_name().await?;
        let manifest = self.render_manifest(&bucket).await?;
        let skills = &self.ctx.providers.skills;

        let skill_id = fatal("createSkill", skills.create_skill(&manifest)).await?;
        self.wait_for_skill_build(&skill_id).await?;

        artifact.tag_skill_id(&bucket, &skill_id).await?;
        self.grant_invoke_permission(&skill_id).await?;
        self.configure_account_linking(&skill_id, &bucket).await?;

        tracing::info!("Skill {} created", skill_id);
        Ok(skill_id)
    }

    /// Re-render the manifest and submit it for the development stage
    pub async fn update_skill_manifest(&self) -> Result<String> {
        let artifact = self.artifact();
        let skill_id = artifact.skill_id().await.ok_or_else(|| {
            DeployError::NotDeployed("no skill is recorded for this project".to_string())
        })?;
        let bucket = artifact.bucket_name().await?;
        let manifest = self.render_manifest(&bucket).await?;

        fatal(
            &format!("updateManifest {}", skill_id),
            self.ctx
                .providers
                .skills
                .update_manifest(&skill_id, SkillStage::Development, &manifest),
        )
        .await?;
        self.wait_for_skill_build(&skill_id).await?;
        Ok(skill_id)
    }

    async fn wait_for_skill_build(&self, skill_id: &str) -> Result<()> {
        let limit = self.ctx.skill_build_timeout;
        let poll = async {
            loop {
                let status = fatal(
                    &format!("getSkillStatus {}", skill_id),
                    self.ctx.providers.skills.get_skill_status(skill_id),
                )
                .await?;
                match status {
                    SkillBuildStatus::Succeeded => return Ok(()),
                    SkillBuildStatus::InProgress => {
                        tokio::time::sleep(self.ctx.skill_poll_interval).await;
                    }
                    SkillBuildStatus::Failed(reason) => {
                        return Err(DeployError::SkillCreationFailed(reason));
                    }
                }
            }
        };
        tokio::time::timeout(limit, poll).await.map_err(|_| {
            tracing::error!("Skill {} still building after {:?}", skill_id, limit);
            DeployError::SkillBuildTimeout {
                skill_id: skill_id.to_string(),
                limit,
            }
        })?
    }

    async fn grant_invoke_permission(&self, skill_id: &str) -> Result<()> {
        let function_name = self.function_name().await?;
        let request = AddPermissionRequest {
            function_name: function_name.clone(),
            statement_id: INVOKE_PERMISSION_ID.to_string(),
            action: "lambda:InvokeFunction".to_string(),
            principal: SKILL_PRINCIPAL.to_string(),
            event_source_token: Some(skill_id.to_string()),
        };
        fatal(
            &format!("addPermission {}", function_name),
            self.ctx.providers.functions.add_permission(&request),
        )
        .await?;
        Ok(())
    }

    /// Connect the user pool's OAuth client to the skill
    pub async fn configure_account_linking(&self, skill_id: &str, bucket: &str) -> Result<()> {
        let project = &self.ctx.project;
        let identity = &self.ctx.providers.identity;
        let pool_id = self.physical_id(USER_POOL_LOGICAL_ID).await?;
        let client_id = self.physical_id(USER_POOL_CLIENT_LOGICAL_ID).await?;

        let pool = fatal(
            &format!("describeUserPool {}", pool_id),
            identity.describe_user_pool(&pool_id),
        )
        .await?;
        let domain = match pool.domain {
            Some(domain) => domain,
            None => {
                let domain = user_pool_domain(&project.project_name, bucket);
                fatal(
                    &format!("createUserPoolDomain {}", domain),
                    identity.create_user_pool_domain(&pool_id, &domain),
                )
                .await?;
                domain
            }
        };

        let mut client = fatal(
            &format!("describeUserPoolClient {}", client_id),
            identity.describe_user_pool_client(&pool_id, &client_id),
        )
        .await?;
        let redirect_urls = redirect_urls(&project.vendor_id);
        client.callback_urls = redirect_urls.clone();
        client.logout_urls = redirect_urls;
        client.allowed_oauth_scopes = OAUTH_SCOPES.iter().map(|s| s.to_string()).collect();
        client.supported_identity_providers = vec!["COGNITO".to_string()];
        fatal(
            &format!("updateUserPoolClient {}", client_id),
            identity.update_user_pool_client(&client),
        )
        .await?;

        let client_secret = client.client_secret.clone().ok_or_else(|| {
            DeployError::AccountLinking(format!("user pool client {} has no secret", client_id))
        })?;
        let (authorization_url, access_token_url) = oauth_urls(&domain, project.region);
        let linking = AccountLinking {
            link_type: "AUTH_CODE".to_string(),
            authorization_url,
            access_token_url,
            client_id: client.client_id.clone(),
            client_secret,
            access_token_scheme: "HTTP_BASIC".to_string(),
            scopes: client.allowed_oauth_scopes.clone(),
            domains: Vec::new(),
            default_token_expiration_in_seconds: TOKEN_EXPIRATION_SECS,
        };

        let skills = &self.ctx.providers.skills;
        let stage = fatal(
            &format!("getSkillStage {}", skill_id),
            skills.get_skill_stage(skill_id),
        )
        .await?;
        fatal(
            &format!("updateAccountLinking {} {}", skill_id, stage),
            skills.update_account_linking(skill_id, stage, &linking),
        )
        .await?;
        Ok(())
    }
}

/// Hosted UI domain prefix: project name plus the bucket's random suffix
pub fn user_pool_domain(project_name: &str, bucket: &str) -> String {
    let suffix = bucket.rsplit('-').next().unwrap_or(bucket);
    format!("{}-{}", project_name, suffix.to_ascii_lowercase())
}

pub fn redirect_urls(vendor_id: &str) -> Vec<String> {
    REDIRECT_URL_TEMPLATES
        .iter()
        .map(|t| t.replace("{vendorId}", vendor_id))
        .collect()
}

/// Authorization and token endpoints of a hosted UI domain
pub fn oauth_urls(domain: &str, region: DeployRegion) -> (String, String) {
    let base = format!("https://{}.auth.{}.amazoncognito.com/oauth2", domain, region);
    (format!("{}/authorize", base), format!("{}/token", base))
}

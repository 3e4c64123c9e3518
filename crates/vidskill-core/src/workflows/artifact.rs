//! Artifact stack: the bucket holding code bundles, the web player and demo content

use crate::context::DeployContext;
use crate::engine::{CreateOutcome, DeleteOutcome, StackDefinition, StackEngine, UpdateOutcome};
use crate::error::{DeployError, Result};
use vidskill_cloud::{StackParameter, Tag, fatal, find_tag, probe};

pub const ARTIFACT_BUCKET_LOGICAL_ID: &str = "ArtifactBucket";

/// Bucket tag recording the skill created for this project
pub const SKILL_ID_TAG: &str = "skillId";

pub struct ArtifactStack<'a> {
    ctx: &'a DeployContext,
}

impl<'a> ArtifactStack<'a> {
    pub fn new(ctx: &'a DeployContext) -> Self {
        Self { ctx }
    }

    pub fn name(&self) -> String {
        self.ctx.project.artifact_stack_name()
    }

    pub fn definition(&self) -> StackDefinition {
        StackDefinition {
            name: self.name(),
            parameters: vec![StackParameter::new(
                "ProjectName",
                &self.ctx.project.project_name,
            )],
            template: self.ctx.project.paths.artifact_template.clone(),
        }
    }

    pub async fn exists(&self) -> bool {
        StackEngine::new(self.ctx).exists(&self.name()).await
    }

    pub async fn create(&self) -> Result<()> {
        match StackEngine::new(self.ctx).create(&self.definition()).await? {
            CreateOutcome::RolledBack => Err(DeployError::StackRolledBack(self.name())),
            CreateOutcome::Created | CreateOutcome::AlreadyExists => Ok(()),
        }
    }

    pub async fn update(&self) -> Result<UpdateOutcome> {
        StackEngine::new(self.ctx).update(&self.definition()).await
    }

    pub async fn delete(&self) -> Result<DeleteOutcome> {
        StackEngine::new(self.ctx).delete(&self.name()).await
    }

    /// Physical name of the artifact bucket
    pub async fn bucket_name(&self) -> Result<String> {
        let name = self.name();
        let resource = fatal(
            &format!("describeStackResource {} {}", name, ARTIFACT_BUCKET_LOGICAL_ID),
            self.ctx
                .providers
                .stacks
                .describe_stack_resource(&name, ARTIFACT_BUCKET_LOGICAL_ID),
        )
        .await?;
        resource.physical_id.ok_or(DeployError::MissingResource {
            stack: name,
            logical_id: ARTIFACT_BUCKET_LOGICAL_ID.to_string(),
        })
    }

    /// Bucket name, `None` when the stack or bucket is not there
    pub async fn find_bucket_name(&self) -> Option<String> {
        let name = self.name();
        probe(
            &format!("describeStackResource {} {}", name, ARTIFACT_BUCKET_LOGICAL_ID),
            self.ctx
                .providers
                .stacks
                .describe_stack_resource(&name, ARTIFACT_BUCKET_LOGICAL_ID),
        )
        .await
        .and_then(|r| r.physical_id)
    }

    /// Skill id recorded on the bucket, if any
    pub async fn skill_id(&self) -> Option<String> {
        let bucket = self.find_bucket_name().await?;
        let tags = probe(
            &format!("getBucketTagging {}", bucket),
            self.ctx.providers.storage.get_bucket_tagging(&bucket),
        )
        .await?;
        find_tag(&tags, SKILL_ID_TAG).map(str::to_string)
    }

    /// Record `skill_id` on the bucket, keeping other user tags
    pub async fn tag_skill_id(&self, bucket: &str, skill_id: &str) -> Result<()> {
        let mut tags = self.user_tags(bucket).await?;
        tags.retain(|t| t.key != SKILL_ID_TAG);
        tags.push(Tag::new(SKILL_ID_TAG, skill_id));
        fatal(
            &format!("putBucketTagging {}", bucket),
            self.ctx.providers.storage.put_bucket_tagging(bucket, &tags),
        )
        .await?;
        Ok(())
    }

    /// Drop the skill id tag, keeping other user tags
    pub async fn untag_skill_id(&self, bucket: &str) -> Result<()> {
        let storage = &self.ctx.providers.storage;
        let mut tags = self.user_tags(bucket).await?;
        let before = tags.len();
        tags.retain(|t| t.key != SKILL_ID_TAG);
        if tags.len() == before {
            return Ok(());
        }
        if tags.is_empty() {
            // An empty tag set cannot be put
            fatal(
                &format!("deleteBucketTagging {}", bucket),
                storage.delete_bucket_tagging(bucket),
            )
            .await?;
        } else {
            fatal(
                &format!("putBucketTagging {}", bucket),
                storage.put_bucket_tagging(bucket, &tags),
            )
            .await?;
        }
        Ok(())
    }

    /// Bucket tags without the reserved `aws:` keys the stack service adds
    async fn user_tags(&self, bucket: &str) -> Result<Vec<Tag>> {
        let mut tags = fatal(
            &format!("getBucketTagging {}", bucket),
            self.ctx.providers.storage.get_bucket_tagging(bucket),
        )
        .await?;
        tags.retain(|t| !t.is_reserved());
        Ok(tags)
    }
}

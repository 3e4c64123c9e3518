//! Provider trait definitions
//!
//! Each trait covers one external service the deploy workflows talk to.
//! The AWS crate and the skill registry client implement them; tests
//! substitute in-memory fakes.

use crate::error::Result;
use crate::function::{
    AddPermissionRequest, FunctionConfiguration, FunctionInfo, UpdateFunctionCodeRequest,
};
use crate::identity::{UserPool, UserPoolClient};
use crate::skill::{AccountLinking, SkillBuildStatus, SkillStage};
use crate::stack::{
    CreateChangeSetRequest, CreateStackRequest, StackDescription, StackResource, WaitCondition,
};
use crate::storage::{ObjectSummary, PutObjectRequest, Tag};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Resource stack provider
#[async_trait]
pub trait StackProvider: Send + Sync {
    /// Describe a stack. A missing stack is an error.
    async fn describe_stack(&self, stack_name: &str) -> Result<StackDescription>;

    /// Submit stack creation, returning the stack id
    async fn create_stack(&self, request: &CreateStackRequest) -> Result<String>;

    async fn delete_stack(&self, stack_name: &str) -> Result<()>;

    /// Create an update change set, returning its id
    async fn create_change_set(&self, request: &CreateChangeSetRequest) -> Result<String>;

    async fn execute_change_set(&self, stack_name: &str, change_set_name: &str) -> Result<()>;

    /// Block until the stack (or change set) reaches `condition`.
    /// Reaching a failure state instead is an error.
    async fn wait_for(&self, condition: &WaitCondition, stack_name: &str) -> Result<()>;

    async fn describe_stack_resources(&self, stack_name: &str) -> Result<Vec<StackResource>>;

    async fn describe_stack_resource(
        &self,
        stack_name: &str,
        logical_id: &str,
    ) -> Result<StackResource>;
}

/// Object storage provider
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Location of a bucket; fails when the bucket does not exist
    async fn get_bucket_location(&self, bucket: &str) -> Result<String>;

    /// All objects under `prefix` (every page)
    async fn list_objects(&self, bucket: &str, prefix: Option<&str>) -> Result<Vec<ObjectSummary>>;

    /// Batch-delete keys, returning how many were deleted
    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> Result<usize>;

    async fn put_object(&self, request: &PutObjectRequest) -> Result<()>;

    /// Tag set of a bucket. A bucket without tags yields an empty set.
    async fn get_bucket_tagging(&self, bucket: &str) -> Result<Vec<Tag>>;

    /// Replace the tag set of a bucket. Keys under `aws:` are reserved and rejected.
    async fn put_bucket_tagging(&self, bucket: &str, tags: &[Tag]) -> Result<()>;

    /// Remove every user tag from a bucket
    async fn delete_bucket_tagging(&self, bucket: &str) -> Result<()>;
}

/// Compute function provider
#[async_trait]
pub trait FunctionProvider: Send + Sync {
    async fn get_function(&self, function_name: &str) -> Result<FunctionInfo>;

    async fn update_function_code(&self, request: &UpdateFunctionCodeRequest) -> Result<()>;

    async fn get_function_configuration(&self, function_name: &str)
    -> Result<FunctionConfiguration>;

    /// Replace the function's environment variables
    async fn update_function_configuration(
        &self,
        function_name: &str,
        environment: &HashMap<String, String>,
    ) -> Result<()>;

    async fn add_permission(&self, request: &AddPermissionRequest) -> Result<()>;
}

/// Identity provider (user pools and their OAuth clients)
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn describe_user_pool(&self, user_pool_id: &str) -> Result<UserPool>;

    async fn describe_user_pool_client(
        &self,
        user_pool_id: &str,
        client_id: &str,
    ) -> Result<UserPoolClient>;

    async fn create_user_pool_domain(&self, user_pool_id: &str, domain: &str) -> Result<()>;

    async fn delete_user_pool_domain(&self, user_pool_id: &str, domain: &str) -> Result<()>;

    /// Overwrite the client's OAuth settings with `client`
    async fn update_user_pool_client(&self, client: &UserPoolClient) -> Result<()>;
}

/// Voice skill registry
#[async_trait]
pub trait SkillRegistry: Send + Sync {
    /// Register a new skill, returning its id
    async fn create_skill(&self, manifest: &serde_json::Value) -> Result<String>;

    async fn get_skill_status(&self, skill_id: &str) -> Result<SkillBuildStatus>;

    async fn update_manifest(
        &self,
        skill_id: &str,
        stage: SkillStage,
        manifest: &serde_json::Value,
    ) -> Result<()>;

    /// Stage the skill is currently in
    async fn get_skill_stage(&self, skill_id: &str) -> Result<SkillStage>;

    async fn update_account_linking(
        &self,
        skill_id: &str,
        stage: SkillStage,
        linking: &AccountLinking,
    ) -> Result<()>;

    async fn delete_skill(&self, skill_id: &str) -> Result<()>;
}

/// The full set of providers a deploy run talks to
#[derive(Clone)]
pub struct Providers {
    pub stacks: Arc<dyn StackProvider>,
    pub storage: Arc<dyn ObjectStorage>,
    pub functions: Arc<dyn FunctionProvider>,
    pub identity: Arc<dyn IdentityProvider>,
    pub skills: Arc<dyn SkillRegistry>,
}

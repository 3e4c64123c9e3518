//! In-memory providers that record every call

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use vidskill_cloud::{
    AccountLinking, AddPermissionRequest, CloudError, CreateChangeSetRequest, CreateStackRequest,
    FunctionConfiguration, FunctionInfo, FunctionProvider, IdentityProvider, ObjectStorage,
    ObjectSummary, Providers, PutObjectRequest, Result, SkillBuildStatus, SkillRegistry,
    SkillStage, StackDescription, StackProvider, StackResource, StackStatus, Tag,
    UpdateFunctionCodeRequest, UserPool, UserPoolClient, WaitCondition, BUCKET_RESOURCE_TYPE,
    USER_POOL_RESOURCE_TYPE,
};
use vidskill_config::{DeployRegion, PathsConfig, ProjectConfig};
use vidskill_core::{ContentFetcher, DeployContext, DeployError};

pub const PROJECT: &str = "demo-video";
pub const ARTIFACT_STACK: &str = "demo-video-artifact-stack";
pub const LAMBDA_STACK: &str = "demo-video-lambda-stack";
pub const BUCKET: &str = "demo-video-artifactbucket-1a2b3c";
pub const FUNCTION: &str = "demo-video-skill-function";
pub const USER_POOL: &str = "us-east-1_Pool1";
pub const CLIENT: &str = "client-1";

const FUNCTION_RESOURCE_TYPE: &str = "AWS::Lambda::Function";
const CLIENT_RESOURCE_TYPE: &str = "AWS::Cognito::UserPoolClient";

pub fn resource(logical_id: &str, physical_id: &str, resource_type: &str) -> StackResource {
    StackResource {
        logical_id: logical_id.to_string(),
        physical_id: Some(physical_id.to_string()),
        resource_type: resource_type.to_string(),
        status: "CREATE_COMPLETE".to_string(),
    }
}

pub fn artifact_resources() -> Vec<StackResource> {
    vec![resource("ArtifactBucket", BUCKET, BUCKET_RESOURCE_TYPE)]
}

pub fn lambda_resources() -> Vec<StackResource> {
    vec![
        resource("SkillFunction", FUNCTION, FUNCTION_RESOURCE_TYPE),
        resource("UserPool", USER_POOL, USER_POOL_RESOURCE_TYPE),
        resource("UserPoolClient", CLIENT, CLIENT_RESOURCE_TYPE),
    ]
}

#[derive(Debug, Clone)]
pub struct FakeStack {
    pub status: StackStatus,
    pub resources: Vec<StackResource>,
}

#[derive(Debug, Clone, Default)]
pub struct FakeBucket {
    pub objects: BTreeMap<String, i64>,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Default)]
pub struct FakeFunction {
    pub arn: String,
    pub environment: HashMap<String, String>,
    pub code: Option<(String, String)>,
    pub permissions: Vec<AddPermissionRequest>,
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub calls: Vec<String>,
    pub stacks: HashMap<String, FakeStack>,
    /// Resources a stack gets once its creation completes
    pub templates: HashMap<String, Vec<StackResource>>,
    /// Stacks whose creation ends in ROLLBACK_COMPLETE
    pub rollback_on_create: HashSet<String>,
    /// Stacks that disappear when their creation fails
    pub vanish_on_create: HashSet<String>,
    pub buckets: HashMap<String, FakeBucket>,
    pub functions: HashMap<String, FakeFunction>,
    pub user_pools: HashMap<String, Option<String>>,
    pub clients: HashMap<String, UserPoolClient>,
    pub skill_statuses: VecDeque<SkillBuildStatus>,
    /// Report every build as in progress once `skill_statuses` runs out
    pub skill_build_stuck: bool,
    pub skills: HashMap<String, serde_json::Value>,
    pub next_skill: usize,
    pub account_linking: Vec<(String, SkillStage, AccountLinking)>,
    pub manifest_updates: Vec<(String, SkillStage)>,
    /// Set when a stack was deleted while one of its buckets held objects
    pub deleted_with_objects: bool,
    /// Object keys whose upload is refused
    pub failing_puts: HashSet<String>,
}

#[derive(Default)]
pub struct FakeCloud {
    pub state: Mutex<FakeState>,
}

fn not_found(what: impl Into<String>) -> CloudError {
    CloudError::ResourceNotFound(what.into())
}

impl FakeCloud {
    pub fn new() -> Arc<Self> {
        let cloud = Self::default();
        {
            let mut state = cloud.state.lock().unwrap();
            state
                .templates
                .insert(ARTIFACT_STACK.to_string(), artifact_resources());
            state
                .templates
                .insert(LAMBDA_STACK.to_string(), lambda_resources());
        }
        Arc::new(cloud)
    }

    pub fn providers(self: &Arc<Self>) -> Providers {
        Providers {
            stacks: self.clone(),
            storage: self.clone(),
            functions: self.clone(),
            identity: self.clone(),
            skills: self.clone(),
        }
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    pub fn calls(&self) -> Vec<String> {
        self.with_state(|s| s.calls.clone())
    }

    pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }

    pub fn clear_calls(&self) {
        self.with_state(|s| s.calls.clear());
    }

    fn record(&self, call: String) {
        self.with_state(|s| s.calls.push(call));
    }

    /// Put a stack in place as if it had been created earlier
    pub fn add_stack(&self, name: &str, resources: Vec<StackResource>) {
        self.with_state(|s| {
            materialize(s, &resources);
            s.stacks.insert(
                name.to_string(),
                FakeStack {
                    status: StackStatus::CreateComplete,
                    resources,
                },
            );
        });
    }

    pub fn add_objects(&self, bucket: &str, keys: &[&str]) {
        self.with_state(|s| {
            let bucket = s.buckets.entry(bucket.to_string()).or_default();
            for key in keys {
                bucket.objects.insert(key.to_string(), 1);
            }
        });
    }

    pub fn set_bucket_tag(&self, bucket: &str, key: &str, value: &str) {
        self.with_state(|s| {
            let bucket = s.buckets.entry(bucket.to_string()).or_default();
            bucket.tags.retain(|t| t.key != key);
            bucket.tags.push(Tag::new(key, value));
        });
    }

    pub fn bucket_tags(&self, bucket: &str) -> Vec<Tag> {
        self.with_state(|s| {
            s.buckets
                .get(bucket)
                .map(|b| b.tags.clone())
                .unwrap_or_default()
        })
    }

    pub fn object_keys(&self, bucket: &str) -> Vec<String> {
        self.with_state(|s| {
            s.buckets
                .get(bucket)
                .map(|b| b.objects.keys().cloned().collect())
                .unwrap_or_default()
        })
    }

    /// Both stacks and the skill tag in place
    pub fn deploy_everything(&self) {
        self.add_stack(ARTIFACT_STACK, artifact_resources());
        self.add_stack(LAMBDA_STACK, lambda_resources());
        self.set_bucket_tag(BUCKET, "skillId", "amzn1.ask.skill.existing");
        self.with_state(|s| {
            s.skills
                .insert("amzn1.ask.skill.existing".to_string(), serde_json::json!({}));
        });
    }
}

/// Create the backing objects for stack resources
fn materialize(state: &mut FakeState, resources: &[StackResource]) {
    for r in resources {
        let Some(id) = r.physical_id.clone() else {
            continue;
        };
        match r.resource_type.as_str() {
            BUCKET_RESOURCE_TYPE => {
                // The stack service stamps its own reserved tags on every bucket
                state.buckets.entry(id).or_insert_with(|| FakeBucket {
                    tags: vec![Tag::new("aws:cloudformation:logical-id", &r.logical_id)],
                    ..Default::default()
                });
            }
            FUNCTION_RESOURCE_TYPE => {
                state.functions.entry(id.clone()).or_insert_with(|| FakeFunction {
                    arn: format!("arn:aws:lambda:us-east-1:123456789012:function:{}", id),
                    ..Default::default()
                });
            }
            USER_POOL_RESOURCE_TYPE => {
                state.user_pools.entry(id).or_insert(None);
            }
            CLIENT_RESOURCE_TYPE => {
                state.clients.entry(id.clone()).or_insert_with(|| UserPoolClient {
                    user_pool_id: USER_POOL.to_string(),
                    client_id: id,
                    client_secret: Some("client-secret".to_string()),
                    ..Default::default()
                });
            }
            _ => {}
        }
    }
}

fn dematerialize(state: &mut FakeState, resources: &[StackResource]) {
    for r in resources {
        let Some(id) = r.physical_id.as_ref() else {
            continue;
        };
        state.buckets.remove(id);
        state.functions.remove(id);
        state.user_pools.remove(id);
        state.clients.remove(id);
    }
}

#[async_trait]
impl StackProvider for FakeCloud {
    async fn describe_stack(&self, stack_name: &str) -> Result<StackDescription> {
        self.record(format!("describeStack:{}", stack_name));
        self.with_state(|s| {
            s.stacks
                .get(stack_name)
                .map(|stack| StackDescription {
                    name: stack_name.to_string(),
                    id: Some(format!("id-{}", stack_name)),
                    status: stack.status.clone(),
                })
                .ok_or_else(|| not_found(stack_name))
        })
    }

    async fn create_stack(&self, request: &CreateStackRequest) -> Result<String> {
        self.record(format!("createStack:{}", request.stack_name));
        self.with_state(|s| {
            s.stacks.insert(
                request.stack_name.clone(),
                FakeStack {
                    status: StackStatus::CreateInProgress,
                    resources: Vec::new(),
                },
            );
        });
        Ok(format!("id-{}", request.stack_name))
    }

    async fn delete_stack(&self, stack_name: &str) -> Result<()> {
        self.record(format!("deleteStack:{}", stack_name));
        self.with_state(|s| {
            let Some(stack) = s.stacks.get(stack_name).cloned() else {
                return Err(not_found(stack_name));
            };
            let non_empty = stack.resources.iter().any(|r| {
                r.is_bucket()
                    && r.physical_id
                        .as_ref()
                        .and_then(|id| s.buckets.get(id))
                        .is_some_and(|b| !b.objects.is_empty())
            });
            if non_empty {
                s.deleted_with_objects = true;
                return Err(CloudError::api("deleteStack", "bucket is not empty"));
            }
            if let Some(stack) = s.stacks.get_mut(stack_name) {
                stack.status = StackStatus::DeleteInProgress;
            }
            Ok(())
        })
    }

    async fn create_change_set(&self, request: &CreateChangeSetRequest) -> Result<String> {
        self.record(format!(
            "createChangeSet:{}:{}",
            request.stack_name, request.change_set_name
        ));
        Ok(format!("cs-{}", request.change_set_name))
    }

    async fn execute_change_set(&self, stack_name: &str, change_set_name: &str) -> Result<()> {
        self.record(format!("executeChangeSet:{}:{}", stack_name, change_set_name));
        self.with_state(|s| {
            if let Some(stack) = s.stacks.get_mut(stack_name) {
                stack.status = StackStatus::UpdateInProgress;
            }
        });
        Ok(())
    }

    async fn wait_for(&self, condition: &WaitCondition, stack_name: &str) -> Result<()> {
        self.record(format!("waitFor:{}:{}", condition, stack_name));
        self.with_state(|s| match condition {
            WaitCondition::StackCreateComplete => {
                if s.rollback_on_create.contains(stack_name) {
                    if let Some(stack) = s.stacks.get_mut(stack_name) {
                        stack.status = StackStatus::RollbackComplete;
                    }
                    return Err(CloudError::WaitFailed {
                        condition: condition.to_string(),
                        target: stack_name.to_string(),
                        message: "ROLLBACK_COMPLETE".to_string(),
                    });
                }
                if s.vanish_on_create.contains(stack_name) {
                    s.stacks.remove(stack_name);
                    return Err(CloudError::WaitFailed {
                        condition: condition.to_string(),
                        target: stack_name.to_string(),
                        message: "stack disappeared".to_string(),
                    });
                }
                let resources = s.templates.get(stack_name).cloned().unwrap_or_default();
                materialize(s, &resources);
                if let Some(stack) = s.stacks.get_mut(stack_name) {
                    stack.status = StackStatus::CreateComplete;
                    stack.resources = resources;
                }
                Ok(())
            }
            WaitCondition::StackUpdateComplete => {
                if let Some(stack) = s.stacks.get_mut(stack_name) {
                    stack.status = StackStatus::UpdateComplete;
                }
                Ok(())
            }
            WaitCondition::StackDeleteComplete => {
                if let Some(stack) = s.stacks.remove(stack_name) {
                    dematerialize(s, &stack.resources);
                }
                Ok(())
            }
            WaitCondition::ChangeSetCreateComplete { .. } => Ok(()),
        })
    }

    async fn describe_stack_resources(&self, stack_name: &str) -> Result<Vec<StackResource>> {
        self.record(format!("describeStackResources:{}", stack_name));
        self.with_state(|s| {
            s.stacks
                .get(stack_name)
                .map(|stack| stack.resources.clone())
                .ok_or_else(|| not_found(stack_name))
        })
    }

    async fn describe_stack_resource(
        &self,
        stack_name: &str,
        logical_id: &str,
    ) -> Result<StackResource> {
        self.with_state(|s| {
            s.stacks
                .get(stack_name)
                .and_then(|stack| {
                    stack
                        .resources
                        .iter()
                        .find(|r| r.logical_id == logical_id)
                        .cloned()
                })
                .ok_or_else(|| not_found(format!("{}/{}", stack_name, logical_id)))
        })
    }
}

#[async_trait]
impl ObjectStorage for FakeCloud {
    async fn get_bucket_location(&self, bucket: &str) -> Result<String> {
        self.record(format!("getBucketLocation:{}", bucket));
        self.with_state(|s| {
            s.buckets
                .contains_key(bucket)
                .then(|| "us-east-1".to_string())
                .ok_or_else(|| not_found(bucket))
        })
    }

    async fn list_objects(&self, bucket: &str, prefix: Option<&str>) -> Result<Vec<ObjectSummary>> {
        self.record(format!("listObjects:{}", bucket));
        self.with_state(|s| {
            let b = s.buckets.get(bucket).ok_or_else(|| not_found(bucket))?;
            Ok(b.objects
                .iter()
                .filter(|(key, _)| prefix.is_none_or(|p| key.starts_with(p)))
                .map(|(key, size)| ObjectSummary {
                    key: key.clone(),
                    size: *size,
                })
                .collect())
        })
    }

    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> Result<usize> {
        self.record(format!("deleteObjects:{}", bucket));
        self.with_state(|s| {
            let b = s.buckets.get_mut(bucket).ok_or_else(|| not_found(bucket))?;
            Ok(keys.iter().filter(|k| b.objects.remove(*k).is_some()).count())
        })
    }

    async fn put_object(&self, request: &PutObjectRequest) -> Result<()> {
        self.record(format!("putObject:{}/{}", request.bucket, request.key));
        if self.with_state(|s| s.failing_puts.contains(&request.key)) {
            return Err(CloudError::api("putObject", "AccessDenied"));
        }
        let size = std::fs::metadata(&request.source)
            .map_err(|e| CloudError::InvalidRequest(format!("{}: {}", request.source.display(), e)))?
            .len() as i64;
        self.with_state(|s| {
            let b = s
                .buckets
                .get_mut(&request.bucket)
                .ok_or_else(|| not_found(&request.bucket))?;
            b.objects.insert(request.key.clone(), size);
            Ok(())
        })
    }

    async fn get_bucket_tagging(&self, bucket: &str) -> Result<Vec<Tag>> {
        self.record(format!("getBucketTagging:{}", bucket));
        self.with_state(|s| {
            s.buckets
                .get(bucket)
                .map(|b| b.tags.clone())
                .ok_or_else(|| not_found(bucket))
        })
    }

    async fn put_bucket_tagging(&self, bucket: &str, tags: &[Tag]) -> Result<()> {
        self.record(format!("putBucketTagging:{}", bucket));
        if let Some(tag) = tags.iter().find(|t| t.is_reserved()) {
            return Err(CloudError::api(
                "putBucketTagging",
                format!("InvalidTag: {} is a reserved key", tag.key),
            ));
        }
        self.with_state(|s| {
            let b = s.buckets.get_mut(bucket).ok_or_else(|| not_found(bucket))?;
            b.tags.retain(|t| t.is_reserved());
            b.tags.extend_from_slice(tags);
            Ok(())
        })
    }

    async fn delete_bucket_tagging(&self, bucket: &str) -> Result<()> {
        self.record(format!("deleteBucketTagging:{}", bucket));
        self.with_state(|s| {
            let b = s.buckets.get_mut(bucket).ok_or_else(|| not_found(bucket))?;
            b.tags.retain(|t| t.is_reserved());
            Ok(())
        })
    }
}

#[async_trait]
impl FunctionProvider for FakeCloud {
    async fn get_function(&self, function_name: &str) -> Result<FunctionInfo> {
        self.record(format!("getFunction:{}", function_name));
        self.with_state(|s| {
            s.functions
                .get(function_name)
                .map(|f| FunctionInfo {
                    name: function_name.to_string(),
                    arn: f.arn.clone(),
                })
                .ok_or_else(|| not_found(function_name))
        })
    }

    async fn update_function_code(&self, request: &UpdateFunctionCodeRequest) -> Result<()> {
        self.record(format!("updateFunctionCode:{}", request.function_name));
        self.with_state(|s| {
            let f = s
                .functions
                .get_mut(&request.function_name)
                .ok_or_else(|| not_found(&request.function_name))?;
            f.code = Some((request.s3_bucket.clone(), request.s3_key.clone()));
            Ok(())
        })
    }

    async fn get_function_configuration(
        &self,
        function_name: &str,
    ) -> Result<FunctionConfiguration> {
        self.record(format!("getFunctionConfiguration:{}", function_name));
        self.with_state(|s| {
            s.functions
                .get(function_name)
                .map(|f| FunctionConfiguration {
                    name: function_name.to_string(),
                    environment: f.environment.clone(),
                })
                .ok_or_else(|| not_found(function_name))
        })
    }

    async fn update_function_configuration(
        &self,
        function_name: &str,
        environment: &HashMap<String, String>,
    ) -> Result<()> {
        self.record(format!("updateFunctionConfiguration:{}", function_name));
        self.with_state(|s| {
            let f = s
                .functions
                .get_mut(function_name)
                .ok_or_else(|| not_found(function_name))?;
            f.environment = environment.clone();
            Ok(())
        })
    }

    async fn add_permission(&self, request: &AddPermissionRequest) -> Result<()> {
        self.record(format!("addPermission:{}", request.function_name));
        self.with_state(|s| {
            let f = s
                .functions
                .get_mut(&request.function_name)
                .ok_or_else(|| not_found(&request.function_name))?;
            f.permissions.push(request.clone());
            Ok(())
        })
    }
}

#[async_trait]
impl IdentityProvider for FakeCloud {
    async fn describe_user_pool(&self, user_pool_id: &str) -> Result<UserPool> {
        self.record(format!("describeUserPool:{}", user_pool_id));
        self.with_state(|s| {
            s.user_pools
                .get(user_pool_id)
                .map(|domain| UserPool {
                    id: user_pool_id.to_string(),
                    domain: domain.clone(),
                })
                .ok_or_else(|| not_found(user_pool_id))
        })
    }

    async fn describe_user_pool_client(
        &self,
        user_pool_id: &str,
        client_id: &str,
    ) -> Result<UserPoolClient> {
        self.record(format!("describeUserPoolClient:{}:{}", user_pool_id, client_id));
        self.with_state(|s| {
            s.clients
                .get(client_id)
                .cloned()
                .ok_or_else(|| not_found(client_id))
        })
    }

    async fn create_user_pool_domain(&self, user_pool_id: &str, domain: &str) -> Result<()> {
        self.record(format!("createUserPoolDomain:{}", domain));
        self.with_state(|s| {
            let pool = s
                .user_pools
                .get_mut(user_pool_id)
                .ok_or_else(|| not_found(user_pool_id))?;
            *pool = Some(domain.to_string());
            Ok(())
        })
    }

    async fn delete_user_pool_domain(&self, user_pool_id: &str, domain: &str) -> Result<()> {
        self.record(format!("deleteUserPoolDomain:{}", domain));
        self.with_state(|s| {
            let pool = s
                .user_pools
                .get_mut(user_pool_id)
                .ok_or_else(|| not_found(user_pool_id))?;
            *pool = None;
            Ok(())
        })
    }

    async fn update_user_pool_client(&self, client: &UserPoolClient) -> Result<()> {
        self.record(format!("updateUserPoolClient:{}", client.client_id));
        self.with_state(|s| {
            s.clients.insert(client.client_id.clone(), client.clone());
        });
        Ok(())
    }
}

#[async_trait]
impl SkillRegistry for FakeCloud {
    async fn create_skill(&self, manifest: &serde_json::Value) -> Result<String> {
        self.record("createSkill".to_string());
        Ok(self.with_state(|s| {
            s.next_skill += 1;
            let id = format!("amzn1.ask.skill.{}", s.next_skill);
            s.skills.insert(id.clone(), manifest.clone());
            id
        }))
    }

    async fn get_skill_status(&self, skill_id: &str) -> Result<SkillBuildStatus> {
        self.record(format!("getSkillStatus:{}", skill_id));
        Ok(self.with_state(|s| {
            s.skill_statuses.pop_front().unwrap_or(if s.skill_build_stuck {
                SkillBuildStatus::InProgress
            } else {
                SkillBuildStatus::Succeeded
            })
        }))
    }

    async fn update_manifest(
        &self,
        skill_id: &str,
        stage: SkillStage,
        manifest: &serde_json::Value,
    ) -> Result<()> {
        self.record(format!("updateManifest:{}", skill_id));
        self.with_state(|s| {
            s.manifest_updates.push((skill_id.to_string(), stage));
            s.skills.insert(skill_id.to_string(), manifest.clone());
        });
        Ok(())
    }

    async fn get_skill_stage(&self, skill_id: &str) -> Result<SkillStage> {
        self.record(format!("getSkillStage:{}", skill_id));
        Ok(SkillStage::Development)
    }

    async fn update_account_linking(
        &self,
        skill_id: &str,
        stage: SkillStage,
        linking: &AccountLinking,
    ) -> Result<()> {
        self.record(format!("updateAccountLinking:{}", skill_id));
        self.with_state(|s| {
            s.account_linking
                .push((skill_id.to_string(), stage, linking.clone()));
        });
        Ok(())
    }

    async fn delete_skill(&self, skill_id: &str) -> Result<()> {
        self.record(format!("deleteSkill:{}", skill_id));
        self.with_state(|s| {
            s.skills
                .remove(skill_id)
                .map(|_| ())
                .ok_or_else(|| not_found(skill_id))
        })
    }
}

/// Fetcher that writes a small file instead of downloading
#[derive(Default)]
pub struct FakeFetcher {
    pub urls: Mutex<Vec<String>>,
    pub fail: bool,
    pub delay: Option<Duration>,
}

impl FakeFetcher {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Default::default()
        }
    }

    pub fn fetched(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentFetcher for FakeFetcher {
    async fn fetch(&self, url: &str, destination: &Path) -> vidskill_core::Result<()> {
        self.urls.lock().unwrap().push(url.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(DeployError::MigrationFailed(format!("GET {}: 503", url)));
        }
        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(destination, b"media")?;
        Ok(())
    }
}

pub const MANIFEST_TEMPLATE: &str = r#"{
  "manifest": {
    "publishingInformation": {
      "locales": { "__LOCALE__": { "name": "__SKILL_NAME__" } },
      "distributionCountries": ["__COUNTRY__"]
    },
    "apis": {
      "video": {
        "locales": { "__LOCALE__": { "videoProviderTargetingNames": ["__SKILL_NAME__"] } },
        "regions": {
          "NA": { "endpoint": { "uri": "__LAMBDA_ARN__" } },
          "EU": { "endpoint": { "uri": "__LAMBDA_ARN__" } },
          "FE": { "endpoint": { "uri": "__LAMBDA_ARN__" } }
        }
      }
    },
    "webPlayer": { "bucket": "__BUCKET_NAME__" }
  }
}"#;

/// A project directory with templates and prebuilt artifacts
pub struct TestProject {
    pub dir: TempDir,
    pub cloud: Arc<FakeCloud>,
    pub fetcher: Arc<FakeFetcher>,
    pub ctx: DeployContext,
}

impl TestProject {
    pub fn new() -> Self {
        Self::with_fetcher(FakeFetcher::default())
    }

    pub fn with_fetcher(fetcher: FakeFetcher) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let write = |relative: &str, content: &str| {
            let path = root.join(relative);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, content).unwrap();
        };
        write("infrastructure/artifact-stack.yaml", "Resources: {}\n");
        write("infrastructure/lambda-stack.yaml", "Resources: {}\n");
        write("infrastructure/skill-manifest.json", MANIFEST_TEMPLATE);
        write("lambda/dist/lambda.zip", "PK");
        write("web-player/dist/index.html", "<html></html>");
        write("web-player/dist/js/player.js", "play()");

        let project = ProjectConfig {
            project_name: PROJECT.to_string(),
            region: DeployRegion::UsEast1,
            aws_profile: None,
            country: "US".to_string(),
            locales: vec!["en-US".to_string()],
            vendor_id: "M1VENDOR".to_string(),
            skill_name: Some("Demo Video".to_string()),
            content_base_url: "https://media.example.com/demo".to_string(),
            paths: PathsConfig {
                lambda_build_command: None,
                web_player_build_command: None,
                ..PathsConfig::default()
            },
            migration_timeout_secs: 5,
        };

        let cloud = FakeCloud::new();
        let fetcher = Arc::new(fetcher);
        let ctx = DeployContext::new(
            project,
            root.to_path_buf(),
            cloud.providers(),
            fetcher.clone(),
        )
        .with_skill_poll_interval(Duration::from_millis(1));

        Self {
            dir,
            cloud,
            fetcher,
            ctx,
        }
    }

    /// Put every demo file in the local cache
    pub fn cache_all_content(&self) {
        let cache = self.ctx.resolve(&self.ctx.project.paths.content_cache_dir);
        for item in vidskill_core::demo_catalog() {
            let path = item.local_path(&cache);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, b"media").unwrap();
        }
    }

    /// Put every demo file in the bucket
    pub fn upload_all_content(&self) {
        let keys: Vec<String> = vidskill_core::demo_catalog()
            .iter()
            .map(|i| i.remote_key())
            .collect();
        let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
        self.cloud.add_objects(BUCKET, &refs);
    }
}

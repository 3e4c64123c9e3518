//! Stack lifecycle engine
//!
//! Create, update and delete one named stack against the stack provider.
//!
//! ```text
//! create:  absent -> creating -> CREATE_COMPLETE
//!                            \-> ROLLBACK_COMPLETE -> deleting -> absent
//! update:  present -> change set ready -> executing -> UPDATE_COMPLETE
//! delete:  present -> buckets emptied, domains removed -> deleting -> absent
//! ```
//!
//! Only a failed creation is inspected and cleaned up. A failed update or
//! delete wait is returned to the caller as is.

use crate::buckets::empty_all_buckets_in_stack;
use crate::context::DeployContext;
use crate::error::Result;
use std::path::PathBuf;
use vidskill_cloud::{
    CallPolicy, Capability, CreateChangeSetRequest, CreateStackRequest, Providers,
    StackDescription, StackParameter, StackResource, USER_POOL_RESOURCE_TYPE, WaitCondition, call,
    fatal, probe,
};

/// A stack as the workflows define it
#[derive(Debug, Clone)]
pub struct StackDefinition {
    pub name: String,
    pub parameters: Vec<StackParameter>,
    /// Template path relative to the project root
    pub template: PathBuf,
}

/// What `create` ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The stack was already there; nothing was submitted
    AlreadyExists,
    Created,
    /// Creation failed, the stack rolled back and has been deleted
    RolledBack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Absent,
    Updated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Absent,
    Deleted,
}

const CAPABILITIES: [Capability; 2] = [Capability::Iam, Capability::NamedIam];

pub struct StackEngine<'a> {
    ctx: &'a DeployContext,
}

impl<'a> StackEngine<'a> {
    pub fn new(ctx: &'a DeployContext) -> Self {
        Self { ctx }
    }

    fn providers(&self) -> &Providers {
        &self.ctx.providers
    }

    /// Describe a stack; `None` when it does not exist
    pub async fn describe(&self, name: &str) -> Option<StackDescription> {
        probe(
            &format!("describeStacks {}", name),
            self.providers().stacks.describe_stack(name),
        )
        .await
    }

    pub async fn exists(&self, name: &str) -> bool {
        self.describe(name).await.is_some()
    }

    /// Resources of a stack, empty when it does not exist
    pub async fn resources(&self, name: &str) -> Vec<StackResource> {
        probe(
            &format!("describeStackResources {}", name),
            self.providers().stacks.describe_stack_resources(name),
        )
        .await
        .unwrap_or_default()
    }

    pub async fn create(&self, stack: &StackDefinition) -> Result<CreateOutcome> {
        if self.exists(&stack.name).await {
            tracing::info!("Stack {} already exists, skipping creation", stack.name);
            return Ok(CreateOutcome::AlreadyExists);
        }

        let request = CreateStackRequest {
            stack_name: stack.name.clone(),
            template_body: self.ctx.read_template(&stack.template).await?,
            parameters: stack.parameters.clone(),
            capabilities: CAPABILITIES.to_vec(),
        };
        fatal(
            &format!("createStack {}", stack.name),
            self.providers().stacks.create_stack(&request),
        )
        .await?;

        let waited = call(
            &format!("waitFor stackCreateComplete {}", stack.name),
            CallPolicy::Tolerant,
            self.providers()
                .stacks
                .wait_for(&WaitCondition::StackCreateComplete, &stack.name),
        )
        .await?;
        if waited.is_some() {
            return Ok(CreateOutcome::Created);
        }

        // The waiter gave up; find out what state the stack is really in
        let status = self.describe(&stack.name).await.map(|d| d.status);
        match status {
            Some(status) if status.is_rollback_terminal() => {
                tracing::error!(
                    "Stack {} ended in {}, deleting it so the next deploy can start clean",
                    stack.name,
                    status
                );
                self.delete(&stack.name).await?;
                Ok(CreateOutcome::RolledBack)
            }
            status => {
                let reported = status
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "absent".to_string());
                Err(vidskill_cloud::CloudError::WaitFailed {
                    condition: WaitCondition::StackCreateComplete.to_string(),
                    target: stack.name.clone(),
                    message: format!("stack status is {}", reported),
                }
                .into())
            }
        }
    }

    pub async fn update(&self, stack: &StackDefinition) -> Result<UpdateOutcome> {
        if !self.exists(&stack.name).await {
            tracing::info!("Stack {} does not exist, nothing to update", stack.name);
            return Ok(UpdateOutcome::Absent);
        }

        let change_set_name = format!("change-set-{}", chrono::Utc::now().timestamp_millis());
        let request = CreateChangeSetRequest {
            stack_name: stack.name.clone(),
            change_set_name: change_set_name.clone(),
            template_body: self.ctx.read_template(&stack.template).await?,
            parameters: stack.parameters.clone(),
            capabilities: CAPABILITIES.to_vec(),
        };
        let stacks = &self.providers().stacks;

        fatal(
            &format!("createChangeSet {} {}", stack.name, change_set_name),
            stacks.create_change_set(&request),
        )
        .await?;
        fatal(
            &format!("waitFor changeSetCreateComplete {}", change_set_name),
            stacks.wait_for(
                &WaitCondition::ChangeSetCreateComplete {
                    change_set_name: change_set_name.clone(),
                },
                &stack.name,
            ),
        )
        .await?;
        fatal(
            &format!("executeChangeSet {}", change_set_name),
            stacks.execute_change_set(&stack.name, &change_set_name),
        )
        .await?;
        fatal(
            &format!("waitFor stackUpdateComplete {}", stack.name),
            stacks.wait_for(&WaitCondition::StackUpdateComplete, &stack.name),
        )
        .await?;

        Ok(UpdateOutcome::Updated)
    }

    pub async fn delete(&self, name: &str) -> Result<DeleteOutcome> {
        if !self.exists(name).await {
            tracing::info!("Stack {} does not exist, nothing to delete", name);
            return Ok(DeleteOutcome::Absent);
        }

        empty_all_buckets_in_stack(self.providers(), name).await?;
        self.remove_user_pool_domains(name).await?;

        let stacks = &self.providers().stacks;
        fatal(&format!("deleteStack {}", name), stacks.delete_stack(name)).await?;
        fatal(
            &format!("waitFor stackDeleteComplete {}", name),
            stacks.wait_for(&WaitCondition::StackDeleteComplete, name),
        )
        .await?;

        Ok(DeleteOutcome::Deleted)
    }

    /// A user pool with a hosted domain cannot be deleted with its stack
    async fn remove_user_pool_domains(&self, name: &str) -> Result<()> {
        let pools: Vec<String> = self
            .resources(name)
            .await
            .into_iter()
            .filter(|r| r.resource_type == USER_POOL_RESOURCE_TYPE)
            .filter_map(|r| r.physical_id)
            .collect();

        let identity = &self.providers().identity;
        for pool_id in pools {
            let pool = probe(
                &format!("describeUserPool {}", pool_id),
                identity.describe_user_pool(&pool_id),
            )
            .await;
            if let Some(domain) = pool.and_then(|p| p.domain) {
                fatal(
                    &format!("deleteUserPoolDomain {}", domain),
                    identity.delete_user_pool_domain(&pool_id, &domain),
                )
                .await?;
            }
        }
        Ok(())
    }
}

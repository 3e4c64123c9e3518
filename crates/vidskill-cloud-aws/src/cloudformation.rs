//! CloudFormation implementation of [`StackProvider`]

use crate::error::api_error;
use async_trait::async_trait;
use aws_sdk_cloudformation as cfn;
use aws_sdk_cloudformation::client::Waiters;
use aws_sdk_cloudformation::error::DisplayErrorContext;
use std::time::Duration;
use vidskill_cloud::{
    Capability, CloudError, CreateChangeSetRequest, CreateStackRequest, Result, StackDescription,
    StackParameter, StackProvider, StackResource, StackStatus, WaitCondition,
};

/// Upper bound for a single waiter; stacks with identity pools take a while
const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(60 * 60);

pub struct CloudFormationStacks {
    client: cfn::Client,
    wait_timeout: Duration,
}

impl CloudFormationStacks {
    pub fn new(client: cfn::Client) -> Self {
        Self {
            client,
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
        }
    }

    pub fn with_wait_timeout(mut self, wait_timeout: Duration) -> Self {
        self.wait_timeout = wait_timeout;
        self
    }
}

fn to_parameters(parameters: &[StackParameter]) -> Vec<cfn::types::Parameter> {
    parameters
        .iter()
        .map(|p| {
            cfn::types::Parameter::builder()
                .parameter_key(&p.key)
                .parameter_value(&p.value)
                .build()
        })
        .collect()
}

fn to_capabilities(capabilities: &[Capability]) -> Vec<cfn::types::Capability> {
    capabilities
        .iter()
        .map(|c| match c {
            Capability::Iam => cfn::types::Capability::CapabilityIam,
            Capability::NamedIam => cfn::types::Capability::CapabilityNamedIam,
        })
        .collect()
}

fn wait_error<E: std::error::Error>(
    condition: &WaitCondition,
    stack_name: &str,
    err: E,
) -> CloudError {
    CloudError::WaitFailed {
        condition: condition.to_string(),
        target: stack_name.to_string(),
        message: DisplayErrorContext(&err).to_string(),
    }
}

#[async_trait]
impl StackProvider for CloudFormationStacks {
    async fn describe_stack(&self, stack_name: &str) -> Result<StackDescription> {
        let response = self
            .client
            .describe_stacks()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(|e| api_error("describeStacks", e))?;

        let stack = response
            .stacks()
            .first()
            .ok_or_else(|| CloudError::ResourceNotFound(stack_name.to_string()))?;

        let status = stack
            .stack_status()
            .map(|s| StackStatus::from_provider(s.as_str()))
            .unwrap_or_else(|| StackStatus::Other("UNKNOWN".to_string()));

        Ok(StackDescription {
            name: stack.stack_name().unwrap_or(stack_name).to_string(),
            id: stack.stack_id().map(str::to_string),
            status,
        })
    }

    async fn create_stack(&self, request: &CreateStackRequest) -> Result<String> {
        let response = self
            .client
            .create_stack()
            .stack_name(&request.stack_name)
            .template_body(&request.template_body)
            .set_parameters(Some(to_parameters(&request.parameters)))
            .set_capabilities(Some(to_capabilities(&request.capabilities)))
            .send()
            .await
            .map_err(|e| api_error("createStack", e))?;

        Ok(response.stack_id().unwrap_or_default().to_string())
    }

    async fn delete_stack(&self, stack_name: &str) -> Result<()> {
        self.client
            .delete_stack()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(|e| api_error("deleteStack", e))?;
        Ok(())
    }

    async fn create_change_set(&self, request: &CreateChangeSetRequest) -> Result<String> {
        let response = self
            .client
            .create_change_set()
            .stack_name(&request.stack_name)
            .change_set_name(&request.change_set_name)
            .change_set_type(cfn::types::ChangeSetType::Update)
            .template_body(&request.template_body)
            .set_parameters(Some(to_parameters(&request.parameters)))
            .set_capabilities(Some(to_capabilities(&request.capabilities)))
            .send()
            .await
            .map_err(|e| api_error("createChangeSet", e))?;

        Ok(response.id().unwrap_or_default().to_string())
    }

    async fn execute_change_set(&self, stack_name: &str, change_set_name: &str) -> Result<()> {
        self.client
            .execute_change_set()
            .stack_name(stack_name)
            .change_set_name(change_set_name)
            .send()
            .await
            .map_err(|e| api_error("executeChangeSet", e))?;
        Ok(())
    }

    async fn wait_for(&self, condition: &WaitCondition, stack_name: &str) -> Result<()> {
        tracing::debug!("waiting for {} on {}", condition, stack_name);

        match condition {
            WaitCondition::StackCreateComplete => self
                .client
                .wait_until_stack_create_complete()
                .stack_name(stack_name)
                .wait(self.wait_timeout)
                .await
                .map(|_| ())
                .map_err(|e| wait_error(condition, stack_name, e)),
            WaitCondition::StackUpdateComplete => self
                .client
                .wait_until_stack_update_complete()
                .stack_name(stack_name)
                .wait(self.wait_timeout)
                .await
                .map(|_| ())
                .map_err(|e| wait_error(condition, stack_name, e)),
            WaitCondition::StackDeleteComplete => self
                .client
                .wait_until_stack_delete_complete()
                .stack_name(stack_name)
                .wait(self.wait_timeout)
                .await
                .map(|_| ())
                .map_err(|e| wait_error(condition, stack_name, e)),
            WaitCondition::ChangeSetCreateComplete { change_set_name } => self
                .client
                .wait_until_change_set_create_complete()
                .stack_name(stack_name)
                .change_set_name(change_set_name)
                .wait(self.wait_timeout)
                .await
                .map(|_| ())
                .map_err(|e| wait_error(condition, stack_name, e)),
        }
    }

    async fn describe_stack_resources(&self, stack_name: &str) -> Result<Vec<StackResource>> {
        let response = self
            .client
            .describe_stack_resources()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(|e| api_error("describeStackResources", e))?;

        Ok(response
            .stack_resources()
            .iter()
            .map(|r| StackResource {
                logical_id: r.logical_resource_id().unwrap_or_default().to_string(),
                physical_id: r.physical_resource_id().map(str::to_string),
                resource_type: r.resource_type().unwrap_or_default().to_string(),
                status: r
                    .resource_status()
                    .map(|s| s.as_str().to_string())
                    .unwrap_or_default(),
            })
            .collect())
    }

    async fn describe_stack_resource(
        &self,
        stack_name: &str,
        logical_id: &str,
    ) -> Result<StackResource> {
        let response = self
            .client
            .describe_stack_resource()
            .stack_name(stack_name)
            .logical_resource_id(logical_id)
            .send()
            .await
            .map_err(|e| api_error("describeStackResource", e))?;

        let detail = response.stack_resource_detail().ok_or_else(|| {
            CloudError::ResourceNotFound(format!("{} in {}", logical_id, stack_name))
        })?;

        Ok(StackResource {
            logical_id: detail.logical_resource_id().unwrap_or(logical_id).to_string(),
            physical_id: detail.physical_resource_id().map(str::to_string),
            resource_type: detail.resource_type().unwrap_or_default().to_string(),
            status: detail
                .resource_status()
                .map(|s| s.as_str().to_string())
                .unwrap_or_default(),
        })
    }
}

//! Lambda implementation of [`FunctionProvider`]

use crate::error::api_error;
use async_trait::async_trait;
use aws_sdk_lambda as lambda;
use std::collections::HashMap;
use vidskill_cloud::{
    AddPermissionRequest, CloudError, FunctionConfiguration, FunctionInfo, FunctionProvider,
    Result, UpdateFunctionCodeRequest,
};

pub struct LambdaFunctions {
    client: lambda::Client,
}

impl LambdaFunctions {
    pub fn new(client: lambda::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FunctionProvider for LambdaFunctions {
    async fn get_function(&self, function_name: &str) -> Result<FunctionInfo> {
        let response = self
            .client
            .get_function()
            .function_name(function_name)
            .send()
            .await
            .map_err(|e| api_error("getFunction", e))?;

        let configuration = response
            .configuration()
            .ok_or_else(|| CloudError::ResourceNotFound(function_name.to_string()))?;

        Ok(FunctionInfo {
            name: configuration
                .function_name()
                .unwrap_or(function_name)
                .to_string(),
            arn: configuration.function_arn().unwrap_or_default().to_string(),
        })
    }

    async fn update_function_code(&self, request: &UpdateFunctionCodeRequest) -> Result<()> {
        self.client
            .update_function_code()
            .function_name(&request.function_name)
            .s3_bucket(&request.s3_bucket)
            .s3_key(&request.s3_key)
            .publish(true)
            .send()
            .await
            .map_err(|e| api_error("updateFunctionCode", e))?;
        Ok(())
    }

    async fn get_function_configuration(
        &self,
        function_name: &str,
    ) -> Result<FunctionConfiguration> {
        let response = self
            .client
            .get_function_configuration()
            .function_name(function_name)
            .send()
            .await
            .map_err(|e| api_error("getFunctionConfiguration", e))?;

        let environment = response
            .environment()
            .and_then(|env| env.variables())
            .cloned()
            .unwrap_or_default();

        Ok(FunctionConfiguration {
            name: response
                .function_name()
                .unwrap_or(function_name)
                .to_string(),
            environment,
        })
    }

    async fn update_function_configuration(
        &self,
        function_name: &str,
        environment: &HashMap<String, String>,
    ) -> Result<()> {
        let environment = lambda::types::Environment::builder()
            .set_variables(Some(environment.clone()))
            .build();

        self.client
            .update_function_configuration()
            .function_name(function_name)
            .environment(environment)
            .send()
            .await
            .map_err(|e| api_error("updateFunctionConfiguration", e))?;
        Ok(())
    }

    async fn add_permission(&self, request: &AddPermissionRequest) -> Result<()> {
        self.client
            .add_permission()
            .function_name(&request.function_name)
            .statement_id(&request.statement_id)
            .action(&request.action)
            .principal(&request.principal)
            .set_event_source_token(request.event_source_token.clone())
            .send()
            .await
            .map_err(|e| api_error("addPermission", e))?;
        Ok(())
    }
}

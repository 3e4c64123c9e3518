//! Cognito implementation of [`IdentityProvider`]

use crate::error::api_error;
use async_trait::async_trait;
use aws_sdk_cognitoidentityprovider as cognito_idp;
use vidskill_cloud::{CloudError, IdentityProvider, Result, UserPool, UserPoolClient};

pub struct CognitoIdentity {
    client: cognito_idp::Client,
}

impl CognitoIdentity {
    pub fn new(client: cognito_idp::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentityProvider for CognitoIdentity {
    async fn describe_user_pool(&self, user_pool_id: &str) -> Result<UserPool> {
        let response = self
            .client
            .describe_user_pool()
            .user_pool_id(user_pool_id)
            .send()
            .await
            .map_err(|e| api_error("describeUserPool", e))?;

        let pool = response
            .user_pool()
            .ok_or_else(|| CloudError::ResourceNotFound(user_pool_id.to_string()))?;

        Ok(UserPool {
            id: pool.id().unwrap_or(user_pool_id).to_string(),
            domain: pool.domain().map(str::to_string),
        })
    }

    async fn describe_user_pool_client(
        &self,
        user_pool_id: &str,
        client_id: &str,
    ) -> Result<UserPoolClient> {
        let response = self
            .client
            .describe_user_pool_client()
            .user_pool_id(user_pool_id)
            .client_id(client_id)
            .send()
            .await
            .map_err(|e| api_error("describeUserPoolClient", e))?;

        let client = response
            .user_pool_client()
            .ok_or_else(|| CloudError::ResourceNotFound(client_id.to_string()))?;

        Ok(UserPoolClient {
            user_pool_id: user_pool_id.to_string(),
            client_id: client.client_id().unwrap_or(client_id).to_string(),
            client_name: client.client_name().map(str::to_string),
            client_secret: client.client_secret().map(str::to_string),
            callback_urls: client.callback_urls().to_vec(),
            logout_urls: client.logout_urls().to_vec(),
            allowed_oauth_scopes: client.allowed_o_auth_scopes().to_vec(),
            supported_identity_providers: client.supported_identity_providers().to_vec(),
        })
    }

    async fn create_user_pool_domain(&self, user_pool_id: &str, domain: &str) -> Result<()> {
        self.client
            .create_user_pool_domain()
            .user_pool_id(user_pool_id)
            .domain(domain)
            .send()
            .await
            .map_err(|e| api_error("createUserPoolDomain", e))?;
        Ok(())
    }

    async fn delete_user_pool_domain(&self, user_pool_id: &str, domain: &str) -> Result<()> {
        self.client
            .delete_user_pool_domain()
            .user_pool_id(user_pool_id)
            .domain(domain)
            .send()
            .await
            .map_err(|e| api_error("deleteUserPoolDomain", e))?;
        Ok(())
    }

    async fn update_user_pool_client(&self, client: &UserPoolClient) -> Result<()> {
        self.client
            .update_user_pool_client()
            .user_pool_id(&client.user_pool_id)
            .client_id(&client.client_id)
            .set_client_name(client.client_name.clone())
            .set_callback_urls(Some(client.callback_urls.clone()))
            .set_logout_urls(Some(client.logout_urls.clone()))
            .allowed_o_auth_flows(cognito_idp::types::OAuthFlowType::Code)
            .allowed_o_auth_flows_user_pool_client(true)
            .set_allowed_o_auth_scopes(Some(client.allowed_oauth_scopes.clone()))
            .set_supported_identity_providers(Some(client.supported_identity_providers.clone()))
            .send()
            .await
            .map_err(|e| api_error("updateUserPoolClient", e))?;
        Ok(())
    }
}

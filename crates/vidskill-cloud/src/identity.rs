//! Identity provider records

use serde::{Deserialize, Serialize};

/// User pool summary; only the hosted-UI domain matters here
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPool {
    pub id: String,
    pub domain: Option<String>,
}

/// OAuth client registered in a user pool
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPoolClient {
    pub user_pool_id: String,
    pub client_id: String,
    pub client_name: Option<String>,
    pub client_secret: Option<String>,
    pub callback_urls: Vec<String>,
    pub logout_urls: Vec<String>,
    pub allowed_oauth_scopes: Vec<String>,
    pub supported_identity_providers: Vec<String>,
}

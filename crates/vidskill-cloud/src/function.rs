//! Compute function records

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Basic information about a deployed function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub name: String,
    pub arn: String,
}

/// Function configuration; only the environment is modelled
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionConfiguration {
    pub name: String,
    pub environment: HashMap<String, String>,
}

/// Replace function code with an archive already uploaded to storage
#[derive(Debug, Clone)]
pub struct UpdateFunctionCodeRequest {
    pub function_name: String,
    pub s3_bucket: String,
    pub s3_key: String,
}

/// Grant an external principal permission to invoke a function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddPermissionRequest {
    pub function_name: String,
    pub statement_id: String,
    pub action: String,
    pub principal: String,
    /// Restricts the grant to callers presenting this token (the skill id)
    pub event_source_token: Option<String>,
}

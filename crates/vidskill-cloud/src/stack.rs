//! Stack records exchanged with the stack provider

use serde::{Deserialize, Serialize};

/// Resource type of a storage bucket inside a stack
pub const BUCKET_RESOURCE_TYPE: &str = "AWS::S3::Bucket";

/// Resource type of an identity user pool inside a stack
pub const USER_POOL_RESOURCE_TYPE: &str = "AWS::Cognito::UserPool";

/// Status of a stack as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StackStatus {
    CreateInProgress,
    CreateFailed,
    CreateComplete,
    RollbackInProgress,
    RollbackFailed,
    RollbackComplete,
    DeleteInProgress,
    DeleteFailed,
    DeleteComplete,
    UpdateInProgress,
    UpdateCompleteCleanupInProgress,
    UpdateComplete,
    UpdateFailed,
    UpdateRollbackInProgress,
    UpdateRollbackFailed,
    UpdateRollbackCompleteCleanupInProgress,
    UpdateRollbackComplete,
    ReviewInProgress,
    /// Any value this tool does not model explicitly
    Other(String),
}

impl StackStatus {
    /// Parse a provider status string such as `CREATE_COMPLETE`
    pub fn from_provider(value: &str) -> Self {
        match value {
            "CREATE_IN_PROGRESS" => StackStatus::CreateInProgress,
            "CREATE_FAILED" => StackStatus::CreateFailed,
            "CREATE_COMPLETE" => StackStatus::CreateComplete,
            "ROLLBACK_IN_PROGRESS" => StackStatus::RollbackInProgress,
            "ROLLBACK_FAILED" => StackStatus::RollbackFailed,
            "ROLLBACK_COMPLETE" => StackStatus::RollbackComplete,
            "DELETE_IN_PROGRESS" => StackStatus::DeleteInProgress,
            "DELETE_FAILED" => StackStatus::DeleteFailed,
            "DELETE_COMPLETE" => StackStatus::DeleteComplete,
            "UPDATE_IN_PROGRESS" => StackStatus::UpdateInProgress,
            "UPDATE_COMPLETE_CLEANUP_IN_PROGRESS" => StackStatus::UpdateCompleteCleanupInProgress,
            "UPDATE_COMPLETE" => StackStatus::UpdateComplete,
            "UPDATE_FAILED" => StackStatus::UpdateFailed,
            "UPDATE_ROLLBACK_IN_PROGRESS" => StackStatus::UpdateRollbackInProgress,
            "UPDATE_ROLLBACK_FAILED" => StackStatus::UpdateRollbackFailed,
            "UPDATE_ROLLBACK_COMPLETE_CLEANUP_IN_PROGRESS" => {
                StackStatus::UpdateRollbackCompleteCleanupInProgress
            }
            "UPDATE_ROLLBACK_COMPLETE" => StackStatus::UpdateRollbackComplete,
            "REVIEW_IN_PROGRESS" => StackStatus::ReviewInProgress,
            other => StackStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StackStatus::CreateInProgress => "CREATE_IN_PROGRESS",
            StackStatus::CreateFailed => "CREATE_FAILED",
            StackStatus::CreateComplete => "CREATE_COMPLETE",
            StackStatus::RollbackInProgress => "ROLLBACK_IN_PROGRESS",
            StackStatus::RollbackFailed => "ROLLBACK_FAILED",
            StackStatus::RollbackComplete => "ROLLBACK_COMPLETE",
            StackStatus::DeleteInProgress => "DELETE_IN_PROGRESS",
            StackStatus::DeleteFailed => "DELETE_FAILED",
            StackStatus::DeleteComplete => "DELETE_COMPLETE",
            StackStatus::UpdateInProgress => "UPDATE_IN_PROGRESS",
            StackStatus::UpdateCompleteCleanupInProgress => "UPDATE_COMPLETE_CLEANUP_IN_PROGRESS",
            StackStatus::UpdateComplete => "UPDATE_COMPLETE",
            StackStatus::UpdateFailed => "UPDATE_FAILED",
            StackStatus::UpdateRollbackInProgress => "UPDATE_ROLLBACK_IN_PROGRESS",
            StackStatus::UpdateRollbackFailed => "UPDATE_ROLLBACK_FAILED",
            StackStatus::UpdateRollbackCompleteCleanupInProgress => {
                "UPDATE_ROLLBACK_COMPLETE_CLEANUP_IN_PROGRESS"
            }
            StackStatus::UpdateRollbackComplete => "UPDATE_ROLLBACK_COMPLETE",
            StackStatus::ReviewInProgress => "REVIEW_IN_PROGRESS",
            StackStatus::Other(value) => value,
        }
    }

    /// A stack left in this state cannot be updated and must be deleted
    pub fn is_rollback_terminal(&self) -> bool {
        matches!(self, StackStatus::RollbackComplete)
    }
}

impl std::fmt::Display for StackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of describing a single stack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackDescription {
    pub name: String,
    pub id: Option<String>,
    pub status: StackStatus,
}

/// One resource provisioned by a stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackResource {
    pub logical_id: String,
    pub physical_id: Option<String>,
    pub resource_type: String,
    pub status: String,
}

impl StackResource {
    pub fn is_bucket(&self) -> bool {
        self.resource_type == BUCKET_RESOURCE_TYPE
    }
}

/// Template parameter passed on create or change-set creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackParameter {
    pub key: String,
    pub value: String,
}

impl StackParameter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// IAM capabilities acknowledged for templates that create roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capability {
    Iam,
    NamedIam,
}

/// Request to create a new stack
#[derive(Debug, Clone)]
pub struct CreateStackRequest {
    pub stack_name: String,
    pub template_body: String,
    pub parameters: Vec<StackParameter>,
    pub capabilities: Vec<Capability>,
}

/// Request to create an update change set for an existing stack
#[derive(Debug, Clone)]
pub struct CreateChangeSetRequest {
    pub stack_name: String,
    pub change_set_name: String,
    pub template_body: String,
    pub parameters: Vec<StackParameter>,
    pub capabilities: Vec<Capability>,
}

/// Terminal condition the provider waiter blocks on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitCondition {
    StackCreateComplete,
    StackUpdateComplete,
    StackDeleteComplete,
    ChangeSetCreateComplete { change_set_name: String },
}

impl std::fmt::Display for WaitCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WaitCondition::StackCreateComplete => write!(f, "stackCreateComplete"),
            WaitCondition::StackUpdateComplete => write!(f, "stackUpdateComplete"),
            WaitCondition::StackDeleteComplete => write!(f, "stackDeleteComplete"),
            WaitCondition::ChangeSetCreateComplete { change_set_name } => {
                write!(f, "changeSetCreateComplete({})", change_set_name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_roundtrip_and_unknown() {
        let status = StackStatus::from_provider("ROLLBACK_COMPLETE");
        assert_eq!(status, StackStatus::RollbackComplete);
        assert!(status.is_rollback_terminal());
        assert_eq!(status.as_str(), "ROLLBACK_COMPLETE");

        let other = StackStatus::from_provider("IMPORT_IN_PROGRESS");
        assert_eq!(other, StackStatus::Other("IMPORT_IN_PROGRESS".to_string()));
        assert!(!other.is_rollback_terminal());
    }

    #[test]
    fn test_update_rollback_is_not_rollback_terminal() {
        assert!(!StackStatus::UpdateRollbackComplete.is_rollback_terminal());
    }
}

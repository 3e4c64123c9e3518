//! AWS provider for VidSkill
//!
//! Implements the stack, storage, function and identity traits of
//! `vidskill-cloud` on top of CloudFormation, S3, Lambda and Cognito.
//!
//! # Requirements
//!
//! - Credentials resolvable by the standard AWS provider chain
//!   (shared credentials/config files, environment, SSO, ...)
//!
//! # Example
//!
//! ```ignore
//! use vidskill_cloud_aws::AwsCloud;
//!
//! let aws = AwsCloud::connect("us-east-1", Some("default")).await;
//! let providers = aws.into_providers(skill_registry);
//! ```

pub mod cloudformation;
mod error;
pub mod cognito;
pub mod lambda;
pub mod s3;

pub use cloudformation::CloudFormationStacks;
pub use cognito::CognitoIdentity;
pub use lambda::LambdaFunctions;
pub use s3::S3Storage;

use aws_config::{BehaviorVersion, Region};
use std::sync::Arc;
use vidskill_cloud::{Providers, SkillRegistry};

/// AWS service clients for one region
pub struct AwsCloud {
    pub stacks: CloudFormationStacks,
    pub storage: S3Storage,
    pub functions: LambdaFunctions,
    pub identity: CognitoIdentity,
}

impl AwsCloud {
    /// Resolve credentials for `profile` (or the default chain) and build clients
    pub async fn connect(region: &str, profile: Option<&str>) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_string()));
        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }
        let config = loader.load().await;

        tracing::debug!(
            "AWS clients configured for region {} (profile: {})",
            region,
            profile.unwrap_or("default chain")
        );

        Self {
            stacks: CloudFormationStacks::new(aws_sdk_cloudformation::Client::new(&config)),
            storage: S3Storage::new(aws_sdk_s3::Client::new(&config)),
            functions: LambdaFunctions::new(aws_sdk_lambda::Client::new(&config)),
            identity: CognitoIdentity::new(aws_sdk_cognitoidentityprovider::Client::new(&config)),
        }
    }

    /// Combine with a skill registry into the provider set used by workflows
    pub fn into_providers(self, skills: Arc<dyn SkillRegistry>) -> Providers {
        Providers {
            stacks: Arc::new(self.stacks),
            storage: Arc::new(self.storage),
            functions: Arc::new(self.functions),
            identity: Arc::new(self.identity),
            skills,
        }
    }
}

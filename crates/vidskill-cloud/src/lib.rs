//! VidSkill Cloud Abstraction
//!
//! This crate defines the typed records and provider traits that the deploy
//! workflows use to talk to external services.
//!
//! # Providers
//!
//! - **Stacks**: resource stacks, change sets and waiters
//! - **Storage**: buckets, objects and bucket tags
//! - **Functions**: compute function code, configuration and permissions
//! - **Identity**: user pools, hosted-UI domains and OAuth clients
//! - **Skills**: the voice skill registry
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  vidskill CLI                    │
//! │          (deploy / update / delete / status)     │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                 vidskill-core                    │
//! │   stack engine · migration · stack workflows     │
//! └─────────────────┬───────────────────────────────┘
//!                   │  call(description, policy, ..)
//! ┌─────────────────▼───────────────────────────────┐
//! │                vidskill-cloud                    │
//! │  trait StackProvider / ObjectStorage / ...       │
//! └───────┬─────────────────┬───────────────────────┘
//!         │                 │
//! ┌───────▼───────┐ ┌───────▼───────┐
//! │  cloud-aws    │ │ skill registry│
//! └───────────────┘ └───────────────┘
//! ```

pub mod call;
pub mod error;
pub mod function;
pub mod identity;
pub mod provider;
pub mod skill;
pub mod stack;
pub mod storage;

// Re-exports
pub use call::{CallPolicy, call, fatal, probe};
pub use error::{CloudError, Result};
pub use function::{
    AddPermissionRequest, FunctionConfiguration, FunctionInfo, UpdateFunctionCodeRequest,
};
pub use identity::{UserPool, UserPoolClient};
pub use provider::{
    FunctionProvider, IdentityProvider, ObjectStorage, Providers, SkillRegistry, StackProvider,
};
pub use skill::{AccountLinking, SkillBuildStatus, SkillStage};
pub use stack::{
    BUCKET_RESOURCE_TYPE, Capability, CreateChangeSetRequest, CreateStackRequest,
    StackDescription, StackParameter, StackResource, StackStatus, USER_POOL_RESOURCE_TYPE,
    WaitCondition,
};
pub use storage::{ObjectSummary, PutObjectRequest, RESERVED_TAG_PREFIX, Tag, find_tag};

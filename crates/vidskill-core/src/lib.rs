//! VidSkill core
//!
//! Deploys the video skill reference app as two stacks plus a skill
//! registration:
//!
//! ```text
//! orchestrator ──> workflows (artifact, lambda + skill)
//!                      │
//!                      ├──> engine ──> buckets
//!                      ├──> migration (background, joined via handle)
//!                      └──> artifacts (build + upload)
//!                               │
//!                               ▼
//!                    vidskill_cloud::Providers
//! ```

pub mod artifacts;
pub mod buckets;
pub mod context;
pub mod engine;
pub mod error;
pub mod migration;
pub mod orchestrator;
pub mod progress;
pub mod workflows;

pub use context::DeployContext;
pub use engine::{CreateOutcome, DeleteOutcome, StackDefinition, StackEngine, UpdateOutcome};
pub use error::{DeployError, Result};
pub use migration::{
    CatalogEntry, CatalogItem, ContentFetcher, HttpFetcher, MigrationHandle, MigrationStatus,
    demo_catalog, plan_migration, run_migration, run_migration_for,
};
pub use orchestrator::{
    DeploymentState, SkillAction, StackReport, StatusReport, UpdateTarget, check_redeploy,
};
pub use workflows::{ArtifactStack, LambdaStack};

//! Skill registry support for VidSkill
//!
//! - [`SkillApiClient`]: bearer-token HTTP client implementing
//!   [`vidskill_cloud::SkillRegistry`]
//! - [`TokenSource`]: access tokens from the environment or a refresh-token
//!   exchange
//! - [`manifest`]: renders the skill manifest template for one region
//!
//! # Example
//!
//! ```ignore
//! use vidskill_skill::{SkillApiClient, TokenSource};
//!
//! let tokens = TokenSource::from_environment_or_file(vidskill_config::credentials_path()?)?;
//! let client = SkillApiClient::new("M1VENDOR", tokens);
//! let stage = client.stage("amzn1.ask.skill.123").await?;
//! ```

pub mod client;
pub mod error;
pub mod manifest;
pub mod token;

#[cfg(test)]
mod testing;

pub use client::{DEFAULT_TIMEOUT, SKILL_API_BASE, SkillApiClient};
pub use error::{Result, SkillError};
pub use manifest::{ManifestContext, render as render_manifest};
pub use token::{TOKEN_ENDPOINT, TokenSource};

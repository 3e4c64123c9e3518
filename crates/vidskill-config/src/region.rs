//! Supported deployment regions

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The three regions the skill registry can route video directives to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeployRegion {
    #[serde(rename = "us-east-1")]
    UsEast1,
    #[serde(rename = "eu-west-1")]
    EuWest1,
    #[serde(rename = "us-west-2")]
    UsWest2,
}

impl DeployRegion {
    pub const ALL: [DeployRegion; 3] = [
        DeployRegion::UsEast1,
        DeployRegion::EuWest1,
        DeployRegion::UsWest2,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeployRegion::UsEast1 => "us-east-1",
            DeployRegion::EuWest1 => "eu-west-1",
            DeployRegion::UsWest2 => "us-west-2",
        }
    }

    /// Key of this region's endpoint block in the skill manifest
    pub fn manifest_key(&self) -> &'static str {
        match self {
            DeployRegion::UsEast1 => "NA",
            DeployRegion::EuWest1 => "EU",
            DeployRegion::UsWest2 => "FE",
        }
    }
}

impl FromStr for DeployRegion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        DeployRegion::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| ConfigError::UnsupportedRegion(s.to_string()))
    }
}

impl std::fmt::Display for DeployRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Object storage records

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A single stored object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSummary {
    pub key: String,
    pub size: i64,
}

/// Prefix of tag keys owned by the platform. They can be read but never written.
pub const RESERVED_TAG_PREFIX: &str = "aws:";

/// A bucket tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn is_reserved(&self) -> bool {
        self.key.starts_with(RESERVED_TAG_PREFIX)
    }
}

/// Find the value of `key` in a tag set
pub fn find_tag<'a>(tags: &'a [Tag], key: &str) -> Option<&'a str> {
    tags.iter()
        .find(|t| t.key == key)
        .map(|t| t.value.as_str())
}

/// Upload of a local file to `bucket/key`
#[derive(Debug, Clone)]
pub struct PutObjectRequest {
    pub bucket: String,
    pub key: String,
    pub source: PathBuf,
    pub content_type: Option<String>,
}

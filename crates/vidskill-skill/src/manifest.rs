//! Skill manifest rendering
//!
//! The template is plain JSON with placeholders. It is parsed first; every
//! placeholder is then resolved on the parsed document, so substituted values
//! are always JSON-escaped when the manifest is serialized again.

use crate::error::{Result, SkillError};
use serde_json::{Map, Value};
use vidskill_config::DeployRegion;

pub const SKILL_NAME_PLACEHOLDER: &str = "__SKILL_NAME__";
pub const BUCKET_NAME_PLACEHOLDER: &str = "__BUCKET_NAME__";
pub const LAMBDA_ARN_PLACEHOLDER: &str = "__LAMBDA_ARN__";
pub const LOCALE_PLACEHOLDER: &str = "__LOCALE__";
pub const COUNTRY_PLACEHOLDER: &str = "__COUNTRY__";

/// Country/locale pairs the registry used to require together
const LEGACY_PAIRS: &[(&str, &str)] = &[
    ("US", "en-US"),
    ("GB", "en-GB"),
    ("DE", "de-DE"),
    ("JP", "ja-JP"),
    ("IN", "en-IN"),
];

/// Values substituted into the manifest template
#[derive(Debug, Clone)]
pub struct ManifestContext {
    pub skill_name: String,
    pub bucket_name: String,
    pub lambda_arn: String,
    pub region: DeployRegion,
    pub countries: Vec<String>,
    pub locales: Vec<String>,
}

impl ManifestContext {
    pub fn new(
        skill_name: impl Into<String>,
        bucket_name: impl Into<String>,
        lambda_arn: impl Into<String>,
        region: DeployRegion,
        country: impl Into<String>,
        locales: Vec<String>,
    ) -> Self {
        Self {
            skill_name: skill_name.into(),
            bucket_name: bucket_name.into(),
            lambda_arn: lambda_arn.into(),
            region,
            countries: vec![country.into()],
            locales,
        }
    }
}

/// Add the partner of every legacy pair present on either side
pub fn reconcile_legacy_pairs(countries: &mut Vec<String>, locales: &mut Vec<String>) {
    for (country, locale) in LEGACY_PAIRS {
        let has_country = countries.iter().any(|c| c == country);
        let has_locale = locales.iter().any(|l| l == locale);
        if has_country && !has_locale {
            tracing::debug!("Adding locale {} required by country {}", locale, country);
            locales.push(locale.to_string());
        }
        if has_locale && !has_country {
            tracing::debug!("Adding country {} required by locale {}", country, locale);
            countries.push(country.to_string());
        }
    }
}

/// Render a manifest template into the document sent to the registry
pub fn render(template: &str, context: &ManifestContext) -> Result<Value> {
    let mut countries = context.countries.clone();
    let mut locales = context.locales.clone();
    reconcile_legacy_pairs(&mut countries, &mut locales);

    let mut document: Value = serde_json::from_str(template)
        .map_err(|e| SkillError::InvalidManifest(e.to_string()))?;

    let regions = regions_block(&mut document).ok_or_else(|| {
        SkillError::InvalidManifest("missing apis.video.regions block".to_string())
    })?;
    let key = context.region.manifest_key();
    let mut survivor = regions.remove(key).ok_or_else(|| {
        SkillError::InvalidManifest(format!("no region block for {}", key))
    })?;
    regions.clear();
    replace_strings(&mut survivor, LAMBDA_ARN_PLACEHOLDER, &context.lambda_arn);
    regions.insert(key.to_string(), survivor);

    expand(&mut document, LOCALE_PLACEHOLDER, &locales);
    expand(&mut document, COUNTRY_PLACEHOLDER, &countries);

    // Free-text values go in last so they are never read as placeholders or JSON
    replace_strings(&mut document, SKILL_NAME_PLACEHOLDER, &context.skill_name);
    replace_strings(&mut document, BUCKET_NAME_PLACEHOLDER, &context.bucket_name);

    Ok(document)
}

fn regions_block(document: &mut Value) -> Option<&mut Map<String, Value>> {
    let root = if document.get("manifest").is_some() {
        document.get_mut("manifest")?
    } else {
        document
    };
    root.get_mut("apis")?
        .get_mut("video")?
        .get_mut("regions")?
        .as_object_mut()
}

fn replace_strings(value: &mut Value, placeholder: &str, replacement: &str) {
    match value {
        Value::String(s) if s.contains(placeholder) => {
            *s = s.replace(placeholder, replacement);
        }
        Value::Array(items) => {
            for item in items {
                replace_strings(item, placeholder, replacement);
            }
        }
        Value::Object(map) => {
            for item in map.values_mut() {
                replace_strings(item, placeholder, replacement);
            }
        }
        _ => {}
    }
}

/// Replace a placeholder key or array entry with one copy per value
fn expand(value: &mut Value, placeholder: &str, values: &[String]) {
    match value {
        Value::Array(items) => {
            let mut expanded = Vec::with_capacity(items.len());
            for mut item in items.drain(..) {
                if item.as_str() == Some(placeholder) {
                    expanded.extend(values.iter().cloned().map(Value::String));
                    continue;
                }
                expand(&mut item, placeholder, values);
                expanded.push(item);
            }
            *items = expanded;
        }
        Value::Object(map) => {
            if let Some(template) = map.remove(placeholder) {
                for v in values {
                    let mut entry = template.clone();
                    replace_strings(&mut entry, placeholder, v);
                    map.insert(v.clone(), entry);
                }
            }
            for item in map.values_mut() {
                expand(item, placeholder, values);
            }
        }
        _ => {}
    }
}

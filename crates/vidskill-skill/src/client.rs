//! Skill registry API client
//!
//! JSON over HTTPS with bearer-token authentication. Every request is bounded
//! by a fixed timeout; a timed out request is reported as a failure.

use crate::error::{Result, SkillError};
use crate::token::TokenSource;
use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use std::time::Duration;
use vidskill_cloud::{AccountLinking, SkillBuildStatus, SkillRegistry, SkillStage};

pub const SKILL_API_BASE: &str = "https://api.amazonalexa.com";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Skill registry client
pub struct SkillApiClient {
    client: reqwest::Client,
    base_url: String,
    vendor_id: String,
    tokens: TokenSource,
    timeout: Duration,
}

impl SkillApiClient {
    pub fn new(vendor_id: impl Into<String>, tokens: TokenSource) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: SKILL_API_BASE.to_string(),
            vendor_id: vendor_id.into(),
            tokens,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn vendor_id(&self) -> &str {
        &self.vendor_id
    }

    /// Send one request and return the raw response body
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<String> {
        let token = self.tokens.access_token(&self.client).await?;
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, &url)
            .bearer_auth(token)
            .timeout(self.timeout);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                SkillError::Timeout(format!("{} after {:?}", url, self.timeout))
            } else {
                SkillError::Http(e)
            }
        })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or(text);
            return Err(SkillError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(text)
    }

    async fn send_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T> {
        let text = self.send(method, path, body).await?;
        serde_json::from_str(&text).map_err(|e| SkillError::InvalidResponse(format!("{}: {}", path, e)))
    }

    pub async fn create(&self, manifest: &serde_json::Value) -> Result<String> {
        let body = CreateSkillRequest {
            vendor_id: &self.vendor_id,
            manifest: manifest_body(manifest),
        };
        let response: CreateSkillResponse = self
            .send_json(Method::POST, "/v1/skills", Some(&body))
            .await?;
        Ok(response.skill_id)
    }

    pub async fn status(&self, skill_id: &str) -> Result<SkillBuildStatus> {
        let response: SkillStatusResponse = self
            .send_json::<_, ()>(Method::GET, &format!("/v1/skills/{}/status", skill_id), None)
            .await?;

        let request = response
            .manifest
            .and_then(|m| m.last_update_request)
            .ok_or_else(|| {
                SkillError::InvalidResponse(format!("no manifest status for {}", skill_id))
            })?;
        let errors: Vec<String> = request.errors.into_iter().map(|e| e.message).collect();
        Ok(SkillBuildStatus::from_registry(&request.status, &errors))
    }

    pub async fn put_manifest(
        &self,
        skill_id: &str,
        stage: SkillStage,
        manifest: &serde_json::Value,
    ) -> Result<()> {
        let body = ManifestEnvelope {
            manifest: manifest_body(manifest),
        };
        self.send(
            Method::PUT,
            &format!("/v1/skills/{}/stages/{}/manifest", skill_id, stage),
            Some(&body),
        )
        .await?;
        Ok(())
    }

    pub async fn stage(&self, skill_id: &str) -> Result<SkillStage> {
        let path = format!(
            "/v1/skills?vendorId={}&skillId={}",
            self.vendor_id, skill_id
        );
        let response: ListSkillsResponse = self.send_json::<_, ()>(Method::GET, &path, None).await?;
        let summary = response
            .skills
            .into_iter()
            .find(|s| s.skill_id == skill_id)
            .ok_or_else(|| SkillError::ApiError {
                status: 404,
                message: format!("skill {} not found", skill_id),
            })?;

        match summary.stage.as_str() {
            "development" => Ok(SkillStage::Development),
            "live" => Ok(SkillStage::Live),
            other => Err(SkillError::InvalidResponse(format!("unknown stage '{}'", other))),
        }
    }

    pub async fn put_account_linking(
        &self,
        skill_id: &str,
        stage: SkillStage,
        linking: &AccountLinking,
    ) -> Result<()> {
        let body = AccountLinkingEnvelope {
            account_linking_request: linking,
        };
        self.send(
            Method::PUT,
            &format!("/v1/skills/{}/stages/{}/accountLinkingClient", skill_id, stage),
            Some(&body),
        )
        .await?;
        Ok(())
    }

    pub async fn delete(&self, skill_id: &str) -> Result<()> {
        self.send::<()>(Method::DELETE, &format!("/v1/skills/{}", skill_id), None)
            .await?;
        Ok(())
    }
}

/// Templates may or may not wrap the manifest in a `manifest` key
fn manifest_body(manifest: &serde_json::Value) -> &serde_json::Value {
    manifest.get("manifest").unwrap_or(manifest)
}

#[async_trait]
impl SkillRegistry for SkillApiClient {
    async fn create_skill(&self, manifest: &serde_json::Value) -> vidskill_cloud::Result<String> {
        Ok(self.create(manifest).await?)
    }

    async fn get_skill_status(&self, skill_id: &str) -> vidskill_cloud::Result<SkillBuildStatus> {
        Ok(self.status(skill_id).await?)
    }

    async fn update_manifest(
        &self,
        skill_id: &str,
        stage: SkillStage,
        manifest: &serde_json::Value,
    ) -> vidskill_cloud::Result<()> {
        Ok(self.put_manifest(skill_id, stage, manifest).await?)
    }

    async fn get_skill_stage(&self, skill_id: &str) -> vidskill_cloud::Result<SkillStage> {
        Ok(self.stage(skill_id).await?)
    }

    async fn update_account_linking(
        &self,
        skill_id: &str,
        stage: SkillStage,
        linking: &AccountLinking,
    ) -> vidskill_cloud::Result<()> {
        Ok(self.put_account_linking(skill_id, stage, linking).await?)
    }

    async fn delete_skill(&self, skill_id: &str) -> vidskill_cloud::Result<()> {
        Ok(self.delete(skill_id).await?)
    }
}

// ============ API Types ============

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateSkillRequest<'a> {
    vendor_id: &'a str,
    manifest: &'a serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateSkillResponse {
    skill_id: String,
}

#[derive(Debug, Serialize)]
struct ManifestEnvelope<'a> {
    manifest: &'a serde_json::Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AccountLinkingEnvelope<'a> {
    account_linking_request: &'a AccountLinking,
}

#[derive(Debug, Deserialize)]
struct SkillStatusResponse {
    manifest: Option<ManifestStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManifestStatus {
    last_update_request: Option<LastUpdateRequest>,
}

#[derive(Debug, Deserialize)]
struct LastUpdateRequest {
    status: String,
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListSkillsResponse {
    #[serde(default)]
    skills: Vec<SkillSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SkillSummary {
    skill_id: String,
    stage: String,
}

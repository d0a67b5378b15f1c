//! DeepCopy API client.
//!
//! Thin HTTP client over the remote research/generation service. Exposes
//! submit, status, and result operations per API version. The client does not
//! retry: a failed poll is reported to the caller, which returns the
//! last-known persisted state instead.

use reqwest::header;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::config::DeepCopySettings;
use crate::error::{AppError, AppResult};
use crate::models::{StatusSnapshot, TargetApproach};

/// DeepCopy HTTP client.
#[derive(Clone)]
pub struct DeepCopyClient {
    base_url: String,
    api_key: SecretString,
    http_client: reqwest::Client,
}

impl DeepCopyClient {
    /// Create a new client from settings.
    pub fn new(settings: &DeepCopySettings) -> Self {
        // Build HTTP client with timeouts
        let http_client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .expect("Failed to build HTTP client for DeepCopy");

        Self {
            base_url: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
            http_client,
        }
    }

    /// Versioned research path prefix.
    fn research_url(&self, approach: TargetApproach, suffix: &str) -> String {
        match approach {
            TargetApproach::V1 => format!("{}/api/v1/research{}", self.base_url, suffix),
            TargetApproach::V2 => format!("{}/api/v2/research{}", self.base_url, suffix),
        }
    }

    /// Submit a new research job. Returns the remote job id.
    pub async fn submit(
        &self,
        approach: TargetApproach,
        request: &JsonValue,
    ) -> AppResult<String> {
        let url = self.research_url(approach, "");
        debug!("DeepCopy submit: {}", url);

        let response = self
            .http_client
            .post(&url)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(request)
            .send()
            .await?
            .error_for_status()?;

        let body: JsonValue = response.json().await?;

        body.get("job_id")
            .or_else(|| body.get("id"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| {
                AppError::Upstream("DeepCopy submit response missing job id".to_string())
            })
    }

    /// Poll the remote status of a job.
    ///
    /// Returns the raw body alongside the status string; the reconciler keeps
    /// the body for the caller and maps the string onto local state.
    pub async fn get_status(
        &self,
        approach: TargetApproach,
        remote_id: &str,
    ) -> AppResult<StatusSnapshot> {
        let url = self.research_url(approach, &format!("/{}/status", remote_id));
        debug!("DeepCopy status poll: {}", url);

        let response = self
            .http_client
            .get(&url)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .send()
            .await?
            .error_for_status()?;

        let raw: JsonValue = response.json().await?;

        let status = raw
            .get("status")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                AppError::Upstream("DeepCopy status response missing status field".to_string())
            })?
            .to_string();

        Ok(StatusSnapshot { status, raw })
    }

    /// Fetch the full result payload of a finished job.
    pub async fn get_result(
        &self,
        approach: TargetApproach,
        remote_id: &str,
    ) -> AppResult<JsonValue> {
        let url = self.research_url(approach, &format!("/{}/result", remote_id));
        debug!("DeepCopy result fetch: {}", url);

        let response = self
            .http_client
            .get(&url)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .send()
            .await?
            .error_for_status()?;

        let payload: JsonValue = response.json().await?;
        Ok(payload)
    }
}

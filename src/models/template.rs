//! Template injection DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Outcome of a batch template-generation run.
///
/// Zero angles is a success with an explanatory message; per-angle failures
/// are counted without aborting the batch.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InjectionSummary {
    pub success: bool,
    /// Rows written (or already present via conflict-skip).
    pub generated: usize,
    /// Angles found in the payload.
    pub total: usize,
    /// Angles that failed extraction or injection.
    pub errors: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Request body for on-demand single-angle injection.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTemplateRequest {
    /// Injectable template to use.
    pub template_id: String,
    /// Marketing-angle text to match against the job's stored angles.
    pub angle: String,
}

/// A single generated template returned by the on-demand path.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedTemplate {
    pub id: Uuid,
    pub angle: String,
    pub template_id: String,
    pub html: String,
}

/// Response of the on-demand single-angle injection endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GenerateTemplateResponse {
    pub success: bool,
    pub template: GeneratedTemplate,
}

/// Response of the manual reprocess endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProcessResultsResponse {
    pub success: bool,
    pub job_id: Uuid,
    /// Batch injection outcome, when generation ran (templates absent).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub injection: Option<InjectionSummary>,
}

/// Injected-template summary for listing endpoints (HTML omitted).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InjectedTemplateSummary {
    pub id: Uuid,
    pub angle_index: i32,
    pub angle_name: String,
    pub template_id: String,
    pub created_at: DateTime<Utc>,
}

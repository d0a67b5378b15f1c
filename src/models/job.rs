//! Job domain models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;
use uuid::Uuid;

/// Job status enum.
///
/// Transitions are monotonic forward; a transient DeepCopy read failure never
/// mutates the stored status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Job created, not yet observed running remotely.
    Pending,
    /// DeepCopy research/generation in progress.
    Processing,
    /// Remote job succeeded; results materialized (or retrying).
    Completed,
    /// Remote job failed.
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// DeepCopy API version a job targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TargetApproach {
    V1,
    V2,
}

impl TargetApproach {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "v1" => Some(Self::V1),
            "v2" => Some(Self::V2),
            _ => None,
        }
    }
}

impl std::fmt::Display for TargetApproach {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Request to create a job and submit it to DeepCopy.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateJobRequest {
    /// Owning user id.
    pub user_id: String,
    /// Display title for the job.
    pub title: String,
    /// Product sales page URL to research.
    pub sales_page_url: String,
    /// Advertorial type (e.g. advertorial, listicle, quiz).
    pub advertorial_type: String,
    /// Preferred injectable template id.
    #[serde(default)]
    pub template_id: Option<String>,
    /// DeepCopy API version (defaults to v2).
    #[serde(default)]
    pub target_approach: Option<TargetApproach>,
    /// Target customer persona description forwarded to DeepCopy.
    #[serde(default)]
    pub persona: Option<String>,
}

/// Response after creating a job.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateJobResponse {
    /// Job UUID (UUIDv7, time-ordered).
    pub job_id: Uuid,
    /// Remote DeepCopy execution id.
    pub execution_id: String,
    /// Initial status.
    pub status: JobStatus,
}

/// Status-poll response.
///
/// `deepcopy_status` carries the raw remote status string, or `API_ERROR` when
/// the poll failed and the persisted state is being reported instead.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct JobStatusResponse {
    /// Local job status.
    pub status: JobStatus,
    /// Progress percentage 0-100.
    pub progress: i32,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Remote status string, or "API_ERROR" on a failed poll.
    pub deepcopy_status: String,
    /// Raw remote status response, when the poll succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deepcopy_response: Option<JsonValue>,
    /// Error detail, when the poll failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deepcopy_error: Option<String>,
}

/// Detailed job response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct JobDetailResponse {
    /// Job UUID.
    pub id: Uuid,
    /// Owning user id.
    pub user_id: String,
    /// Remote DeepCopy execution id, if stored separately.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_id: Option<String>,
    /// Job status.
    pub status: JobStatus,
    /// Progress percentage 0-100.
    pub progress: i32,
    /// Injectable template id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    /// Advertorial type.
    pub advertorial_type: String,
    /// DeepCopy API version.
    pub target_approach: TargetApproach,
    /// Display title.
    pub title: String,
    /// Product sales page URL.
    pub sales_page_url: String,
    /// Customer avatars (v2 jobs, after materialization).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatars: Option<JsonValue>,
    /// Product screenshot URL (v2 jobs, after materialization).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_image: Option<String>,
    /// Last artifact-generation failure, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_error: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Job list response with pagination.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct JobListResponse {
    /// List of jobs.
    pub jobs: Vec<JobDetailResponse>,
    /// Total number of jobs matching filter.
    pub total: i64,
    /// Limit used.
    pub limit: i32,
    /// Offset used.
    pub offset: i32,
}

/// Query parameters for listing jobs.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct QueryJobsParams {
    /// Filter by owning user.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Filter by status.
    #[serde(default)]
    pub status: Option<JobStatus>,
    /// Filter by advertorial type.
    #[serde(default)]
    pub advertorial_type: Option<String>,
    /// Filter from date.
    #[serde(default)]
    pub from_date: Option<DateTime<Utc>>,
    /// Filter to date.
    #[serde(default)]
    pub to_date: Option<DateTime<Utc>>,
    /// Maximum results to return.
    #[serde(default = "default_limit")]
    pub limit: i32,
    /// Offset for pagination.
    #[serde(default)]
    pub offset: i32,
}

fn default_limit() -> i32 {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for s in ["pending", "processing", "completed", "failed"] {
            assert_eq!(JobStatus::parse(s).unwrap().as_str(), s);
        }
        assert_eq!(JobStatus::parse("complete"), None);
    }

    #[test]
    fn test_target_approach_parsing() {
        assert_eq!(TargetApproach::parse("v1"), Some(TargetApproach::V1));
        assert_eq!(TargetApproach::parse("v2"), Some(TargetApproach::V2));
        assert_eq!(TargetApproach::parse("v3"), None);
    }
}

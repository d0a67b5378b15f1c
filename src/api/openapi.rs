//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pre-lander Generation Server",
        version = "0.1.0",
        description = "API server for DeepCopy-backed pre-lander generation jobs: submission, status reconciliation, result materialization, and template injection"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Job endpoints
        api::jobs::create_job,
        api::jobs::query_jobs,
        api::jobs::get_job,
        api::jobs::get_job_status,
        api::jobs::get_job_result,
        api::jobs::process_results,
        api::jobs::generate_template,
        api::jobs::list_job_templates,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Jobs
            models::JobStatus,
            models::TargetApproach,
            models::CreateJobRequest,
            models::CreateJobResponse,
            models::JobStatusResponse,
            models::JobDetailResponse,
            models::JobListResponse,
            models::QueryJobsParams,
            models::Avatar,
            // Templates
            models::InjectionSummary,
            models::GenerateTemplateRequest,
            models::GenerateTemplateResponse,
            models::GeneratedTemplate,
            models::ProcessResultsResponse,
            models::InjectedTemplateSummary,
        )
    ),
    tags(
        (name = "Health", description = "Service health and readiness"),
        (name = "Jobs", description = "Pre-lander generation job lifecycle")
    )
)]
pub struct ApiDoc;

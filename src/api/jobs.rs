//! Job API handlers.

use actix_web::{HttpResponse, http::header, web};
use chrono::Utc;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::db::DbPool;
use crate::entity::job;
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateJobRequest, CreateJobResponse, GenerateTemplateRequest, GenerateTemplateResponse,
    InjectedTemplateSummary, JobDetailResponse, JobListResponse, JobStatus, ProcessResultsResponse,
    QueryJobsParams, ResultMetadata, TargetApproach,
};
use crate::services::{DeepCopyClient, injector, materializer, reconciler};

/// Map a job row to its detail DTO.
fn job_to_detail(job: job::Model) -> JobDetailResponse {
    JobDetailResponse {
        id: job.id,
        user_id: job.user_id,
        execution_id: job.execution_id,
        status: JobStatus::parse(&job.status).unwrap_or(JobStatus::Pending),
        progress: job.progress,
        template_id: job.template_id,
        advertorial_type: job.advertorial_type,
        target_approach: TargetApproach::parse(&job.target_approach)
            .unwrap_or(TargetApproach::V2),
        title: job.title,
        sales_page_url: job.sales_page_url,
        avatars: job.avatars,
        product_image: job.product_image,
        artifact_error: job.artifact_error,
        created_at: job.created_at,
        updated_at: job.updated_at,
    }
}

/// Create a job and submit it to DeepCopy.
#[utoipa::path(
    post,
    path = "/api/v1/jobs",
    tag = "Jobs",
    request_body = CreateJobRequest,
    responses(
        (status = 200, description = "Job created and submitted", body = CreateJobResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 502, description = "DeepCopy submission failed", body = crate::error::ErrorResponse),
    )
)]
pub async fn create_job(
    pool: web::Data<DbPool>,
    client: web::Data<DeepCopyClient>,
    body: web::Json<CreateJobRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if req.sales_page_url.is_empty() {
        return Err(AppError::InvalidInput(
            "sales_page_url must not be empty".to_string(),
        ));
    }
    if req.user_id.is_empty() {
        return Err(AppError::InvalidInput(
            "user_id must not be empty".to_string(),
        ));
    }

    let approach = req.target_approach.unwrap_or(TargetApproach::V2);

    let submit_body = json!({
        "sales_page_url": req.sales_page_url,
        "advertorial_type": req.advertorial_type,
        "persona": req.persona,
        "title": req.title,
    });

    let execution_id = client.submit(approach, &submit_body).await?;

    // Generate UUIDv7 for time-ordered job ID
    let job_id = Uuid::now_v7();
    let job = pool
        .insert_job(job_id, Some(execution_id.clone()), &req, approach)
        .await?;

    info!(
        "Job created: job_id={}, execution_id={}, approach={}",
        job.id, execution_id, approach
    );

    Ok(HttpResponse::Ok().json(CreateJobResponse {
        job_id: job.id,
        execution_id,
        status: JobStatus::Pending,
    }))
}

/// Poll and reconcile a job's status against DeepCopy.
///
/// Sits behind a CDN: the response carries no-cache headers and an
/// X-Timestamp so the poller always sees fresh state.
#[utoipa::path(
    get,
    path = "/api/v1/jobs/{id}/status",
    tag = "Jobs",
    params(
        ("id" = Uuid, Path, description = "Job UUID")
    ),
    responses(
        (status = 200, description = "Current job status", body = crate::models::JobStatusResponse),
        (status = 404, description = "Job not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_job_status(
    pool: web::Data<DbPool>,
    client: web::Data<DeepCopyClient>,
    config: web::Data<Config>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let job_id = path.into_inner();

    let response = reconciler::reconcile(&pool, &client, &config, job_id).await?;

    Ok(HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"))
        .insert_header((header::PRAGMA, "no-cache"))
        .insert_header((header::EXPIRES, "0"))
        .insert_header(("X-Timestamp", Utc::now().to_rfc3339()))
        .json(response))
}

/// Manually re-fetch and re-process a job's results.
///
/// Fetches the remote result, caches it on the job row, re-runs
/// materialization, and re-attempts template generation when no templates
/// exist yet.
#[utoipa::path(
    post,
    path = "/api/v1/jobs/{id}/process-results",
    tag = "Jobs",
    params(
        ("id" = Uuid, Path, description = "Job UUID")
    ),
    responses(
        (status = 200, description = "Results processed", body = ProcessResultsResponse),
        (status = 404, description = "Job not found", body = crate::error::ErrorResponse),
        (status = 502, description = "DeepCopy fetch failed", body = crate::error::ErrorResponse),
    )
)]
pub async fn process_results(
    pool: web::Data<DbPool>,
    client: web::Data<DeepCopyClient>,
    config: web::Data<Config>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let job_id = path.into_inner();

    let job = pool
        .get_job_by_id(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {}", job_id)))?;

    let approach = TargetApproach::parse(&job.target_approach).unwrap_or(TargetApproach::V2);
    let remote_id = reconciler::remote_job_id(&job);

    let payload = client.get_result(approach, &remote_id).await?;
    let job = pool.cache_job_result(job_id, payload.clone()).await?;

    materializer::materialize(&pool, &config, &job, &payload, &remote_id).await?;

    // Regenerate templates only when none exist (first batch wins)
    let injection = if pool.count_injected_templates(job_id).await? == 0 {
        Some(injector::generate_injected_templates(&pool, &job, &payload).await?)
    } else {
        None
    };

    info!("Results reprocessed: job_id={}", job_id);

    Ok(HttpResponse::Ok().json(ProcessResultsResponse {
        success: true,
        job_id,
        injection,
    }))
}

/// Generate a single template on demand for a chosen angle.
#[utoipa::path(
    post,
    path = "/api/v1/jobs/{id}/generate-template",
    tag = "Jobs",
    params(
        ("id" = Uuid, Path, description = "Job UUID")
    ),
    request_body = GenerateTemplateRequest,
    responses(
        (status = 200, description = "Template generated", body = GenerateTemplateResponse),
        (status = 404, description = "Job, template, or angle not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn generate_template(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<GenerateTemplateRequest>,
) -> AppResult<HttpResponse> {
    let job_id = path.into_inner();
    let req = body.into_inner();

    let job = pool
        .get_job_by_id(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {}", job_id)))?;

    let template =
        injector::generate_single_template(&pool, &job, &req.template_id, &req.angle).await?;

    info!(
        "On-demand template generated: job_id={}, angle={}",
        job_id, template.angle
    );

    Ok(HttpResponse::Ok().json(GenerateTemplateResponse {
        success: true,
        template,
    }))
}

/// List injected templates for a job.
#[utoipa::path(
    get,
    path = "/api/v1/jobs/{id}/templates",
    tag = "Jobs",
    params(
        ("id" = Uuid, Path, description = "Job UUID")
    ),
    responses(
        (status = 200, description = "Injected templates", body = [InjectedTemplateSummary]),
        (status = 404, description = "Job not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn list_job_templates(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let job_id = path.into_inner();

    pool.get_job_by_id(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {}", job_id)))?;

    let templates = pool.get_injected_templates(job_id).await?;

    let summaries: Vec<InjectedTemplateSummary> = templates
        .into_iter()
        .map(|t| InjectedTemplateSummary {
            id: t.id,
            angle_index: t.angle_index,
            angle_name: t.angle_name,
            template_id: t.template_id,
            created_at: t.created_at,
        })
        .collect();

    Ok(HttpResponse::Ok().json(summaries))
}

/// Query jobs with filtering and pagination.
#[utoipa::path(
    get,
    path = "/api/v1/jobs",
    tag = "Jobs",
    params(
        ("user_id" = Option<String>, Query, description = "Filter by owning user"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("advertorial_type" = Option<String>, Query, description = "Filter by advertorial type"),
        ("from_date" = Option<String>, Query, description = "Filter from date (ISO 8601)"),
        ("to_date" = Option<String>, Query, description = "Filter to date (ISO 8601)"),
        ("limit" = Option<i32>, Query, description = "Results per page (default 20, max 100)"),
        ("offset" = Option<i32>, Query, description = "Pagination offset")
    ),
    responses(
        (status = 200, description = "List of jobs", body = JobListResponse),
    )
)]
pub async fn query_jobs(
    pool: web::Data<DbPool>,
    query: web::Query<QueryJobsParams>,
) -> AppResult<HttpResponse> {
    let params = query.into_inner();
    let (jobs, total) = pool.query_jobs(&params).await?;

    let jobs_response: Vec<JobDetailResponse> = jobs.into_iter().map(job_to_detail).collect();

    let response = JobListResponse {
        jobs: jobs_response,
        total: total as i64,
        limit: params.limit,
        offset: params.offset,
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Get a single job by ID.
#[utoipa::path(
    get,
    path = "/api/v1/jobs/{id}",
    tag = "Jobs",
    params(
        ("id" = Uuid, Path, description = "Job UUID")
    ),
    responses(
        (status = 200, description = "Job details", body = JobDetailResponse),
        (status = 404, description = "Job not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_job(pool: web::Data<DbPool>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let job_id = path.into_inner();

    let job = pool
        .get_job_by_id(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {}", job_id)))?;

    Ok(HttpResponse::Ok().json(job_to_detail(job)))
}

/// Get the materialized result for a job.
#[utoipa::path(
    get,
    path = "/api/v1/jobs/{id}/result",
    tag = "Jobs",
    params(
        ("id" = Uuid, Path, description = "Job UUID")
    ),
    responses(
        (status = 200, description = "Materialized result"),
        (status = 404, description = "Job or result not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_job_result(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let job_id = path.into_inner();

    let result = pool
        .get_result(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Results for job {}", job_id)))?;

    let metadata = ResultMetadata::from_json(&result.metadata);

    Ok(HttpResponse::Ok().json(json!({
        "job_id": result.job_id,
        "html_content": result.html_content,
        "metadata": metadata,
        "created_at": result.created_at,
        "updated_at": result.updated_at,
    })))
}

/// Configure job routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/jobs")
            .route(web::get().to(query_jobs))
            .route(web::post().to(create_job)),
    )
    .service(web::resource("/jobs/{id}").route(web::get().to(get_job)))
    .service(web::resource("/jobs/{id}/status").route(web::get().to(get_job_status)))
    .service(web::resource("/jobs/{id}/result").route(web::get().to(get_job_result)))
    .service(web::resource("/jobs/{id}/process-results").route(web::post().to(process_results)))
    .service(web::resource("/jobs/{id}/generate-template").route(web::post().to(generate_template)))
    .service(web::resource("/jobs/{id}/templates").route(web::get().to(list_job_templates)));
}

//! Status reconciliation state machine.
//!
//! Maps remote DeepCopy status onto local job state on every poll and drives
//! downstream materialization on the completed transition. Status is
//! authoritative on the remote signal; artifact generation is best-effort and
//! retried on later polls until it succeeds once.

use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::db::DbPool;
use crate::entity::job;
use crate::error::{AppError, AppResult};
use crate::models::{JobStatus, JobStatusResponse, RemoteStatus, ResultMetadata, TargetApproach};
use crate::services::{billing, deepcopy::DeepCopyClient, injector, materializer};

/// Remote status marker returned when the poll itself failed.
pub const API_ERROR: &str = "API_ERROR";

/// Map a remote status to the local status/progress pair.
///
/// Fixed table; FAILED keeps the job's current progress (0 for jobs that
/// never reported any).
pub fn map_remote_status(remote: RemoteStatus, current_progress: i32) -> (JobStatus, i32) {
    match remote {
        RemoteStatus::Succeeded => (JobStatus::Completed, 100),
        RemoteStatus::Failed => (JobStatus::Failed, current_progress),
        RemoteStatus::Submitted => (JobStatus::Processing, 25),
        RemoteStatus::Running => (JobStatus::Processing, 50),
        RemoteStatus::Pending => (JobStatus::Processing, 30),
    }
}

/// The remote id of a job: `execution_id` when present, else the job's own id
/// (two historical creation conventions).
pub fn remote_job_id(job: &job::Model) -> String {
    job.execution_id
        .clone()
        .unwrap_or_else(|| job.id.to_string())
}

/// Reconcile a job against the remote service.
///
/// A failed remote read never mutates the row: the caller gets the last
/// persisted state annotated `API_ERROR` and polls again later.
pub async fn reconcile(
    pool: &DbPool,
    client: &DeepCopyClient,
    config: &Config,
    job_id: Uuid,
) -> AppResult<JobStatusResponse> {
    let job = pool
        .get_job_by_id(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {}", job_id)))?;

    let approach = TargetApproach::parse(&job.target_approach).unwrap_or(TargetApproach::V2);
    let remote_id = remote_job_id(&job);

    let snapshot = match client.get_status(approach, &remote_id).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!(
                "DeepCopy status poll failed for job {} (remote {}): {}",
                job_id, remote_id, e
            );
            return Ok(JobStatusResponse {
                status: JobStatus::parse(&job.status).unwrap_or(JobStatus::Pending),
                progress: job.progress,
                updated_at: job.updated_at,
                deepcopy_status: API_ERROR.to_string(),
                deepcopy_response: None,
                deepcopy_error: Some(e.to_string()),
            });
        }
    };

    let was_completed = job.status == JobStatus::Completed.as_str();

    let job = match RemoteStatus::parse(&snapshot.status) {
        Some(remote) => {
            let (local, progress) = map_remote_status(remote, job.progress);
            // Persisted on every successful poll; a terminal job is a
            // state-wise no-op
            pool.update_job_status(job_id, local, Some(progress)).await?
        }
        None => {
            warn!(
                "Unknown DeepCopy status '{}' for job {}; leaving local status unchanged",
                snapshot.status, job_id
            );
            job
        }
    };

    let status = JobStatus::parse(&job.status).unwrap_or(JobStatus::Pending);

    if status == JobStatus::Completed {
        if !was_completed {
            on_completed_transition(pool, client, config, &job, approach, &remote_id).await;
        }
        retry_template_generation(pool, &job).await;
    }

    Ok(JobStatusResponse {
        status,
        progress: job.progress,
        updated_at: job.updated_at,
        deepcopy_status: snapshot.status,
        deepcopy_response: Some(snapshot.raw),
        deepcopy_error: None,
    })
}

/// Completed-transition side effects: fetch and materialize the result, then
/// record the credit event. Failures are logged and recorded on the job, not
/// propagated; the status response must never block on them.
async fn on_completed_transition(
    pool: &DbPool,
    client: &DeepCopyClient,
    config: &Config,
    job: &job::Model,
    approach: TargetApproach,
    remote_id: &str,
) {
    info!("Job {} completed, materializing results", job.id);

    let materialized = match client.get_result(approach, remote_id).await {
        Ok(payload) => materializer::materialize(pool, config, job, &payload, remote_id).await,
        Err(e) => Err(e),
    };

    if let Err(e) = materialized {
        warn!("Materialization failed for job {}: {}", job.id, e);
        if let Err(db_err) = pool
            .set_job_artifact_error(job.id, Some(e.to_string()))
            .await
        {
            warn!(
                "Failed to record artifact error for job {}: {}",
                job.id, db_err
            );
        }
    }

    if let Err(e) = billing::record_job_completion(pool, job).await {
        warn!("Credit recording failed for job {}: {}", job.id, e);
    }
}

/// Retry template generation for a completed job until at least one row
/// exists. Reads the persisted result payload, never the remote service.
async fn retry_template_generation(pool: &DbPool, job: &job::Model) {
    let existing = match pool.count_injected_templates(job.id).await {
        Ok(count) => count,
        Err(e) => {
            warn!("Failed to count injected templates for {}: {}", job.id, e);
            return;
        }
    };

    if existing > 0 {
        return;
    }

    let result_row = match pool.get_result(job.id).await {
        Ok(Some(row)) => row,
        Ok(None) => {
            // Materialization has not landed yet; the next poll retries
            return;
        }
        Err(e) => {
            warn!("Failed to load result for job {}: {}", job.id, e);
            return;
        }
    };

    let Some(metadata) = ResultMetadata::from_json(&result_row.metadata) else {
        warn!("Stored metadata for job {} is unreadable", job.id);
        return;
    };

    match injector::generate_injected_templates(pool, job, &metadata.full_result).await {
        Ok(summary) => {
            if summary.errors > 0 {
                let _ = pool
                    .set_job_artifact_error(
                        job.id,
                        Some(format!(
                            "Template generation: {}/{} angles failed",
                            summary.errors, summary.total
                        )),
                    )
                    .await;
            } else if job.artifact_error.is_some() {
                let _ = pool.set_job_artifact_error(job.id, None).await;
            }
        }
        Err(e) => {
            warn!("Template generation failed for job {}: {}", job.id, e);
            let _ = pool
                .set_job_artifact_error(job.id, Some(e.to_string()))
                .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping_matches_fixed_table() {
        assert_eq!(
            map_remote_status(RemoteStatus::Succeeded, 50),
            (JobStatus::Completed, 100)
        );
        assert_eq!(
            map_remote_status(RemoteStatus::Submitted, 0),
            (JobStatus::Processing, 25)
        );
        assert_eq!(
            map_remote_status(RemoteStatus::Running, 25),
            (JobStatus::Processing, 50)
        );
        assert_eq!(
            map_remote_status(RemoteStatus::Pending, 0),
            (JobStatus::Processing, 30)
        );
    }

    #[test]
    fn test_failed_keeps_current_progress() {
        assert_eq!(
            map_remote_status(RemoteStatus::Failed, 50),
            (JobStatus::Failed, 50)
        );
        // Jobs that never reported progress stay at zero
        assert_eq!(
            map_remote_status(RemoteStatus::Failed, 0),
            (JobStatus::Failed, 0)
        );
    }

    #[test]
    fn test_mapping_is_total_over_remote_states() {
        for remote in [
            RemoteStatus::Submitted,
            RemoteStatus::Pending,
            RemoteStatus::Running,
            RemoteStatus::Succeeded,
            RemoteStatus::Failed,
        ] {
            let (status, progress) = map_remote_status(remote, 10);
            assert!((0..=100).contains(&progress));
            // Every remote state lands on a defined local state
            assert!(JobStatus::parse(status.as_str()).is_some());
        }
    }
}

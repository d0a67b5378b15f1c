//! Credit recording for completed jobs.
//!
//! External collaborator made concrete: one credit-consumption event of a
//! given type per job/user, written idempotently.

use tracing::{info, warn};

use crate::db::DbPool;
use crate::entity::job;
use crate::error::AppResult;

/// Event type recorded when a pre-lander generation job completes.
pub const EVENT_PRELANDER_GENERATION: &str = "prelander_generation";

/// Record the generation credit for a completed job.
///
/// Idempotent: a repeat call for the same job finds the existing event and
/// does nothing. Returns whether a new event was written.
pub async fn record_job_completion(pool: &DbPool, job: &job::Model) -> AppResult<bool> {
    let inserted = pool
        .record_credit_event(job.id, &job.user_id, EVENT_PRELANDER_GENERATION)
        .await?;

    if inserted {
        info!(
            "Credit event recorded: job_id={}, user_id={}, type={}",
            job.id, job.user_id, EVENT_PRELANDER_GENERATION
        );
    } else {
        warn!(
            "Credit event already recorded for job {}, skipping",
            job.id
        );
    }

    Ok(inserted)
}

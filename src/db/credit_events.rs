//! Database queries for credit events.

use sea_orm::{ConnectionTrait, Statement};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

use super::DbPool;

impl DbPool {
    /// Record a credit-consumption event for a job.
    ///
    /// `(job_id, event_type)` is unique, so recording is idempotent: returns
    /// `true` when a new event was written, `false` when one already existed.
    pub async fn record_credit_event(
        &self,
        job_id: Uuid,
        user_id: &str,
        event_type: &str,
    ) -> AppResult<bool> {
        let stmt = Statement::from_sql_and_values(
            sea_orm::DatabaseBackend::Postgres,
            "INSERT INTO credit_events (id, job_id, user_id, event_type, created_at) \
             VALUES ($1, $2, $3, $4, NOW()) \
             ON CONFLICT (job_id, event_type) DO NOTHING",
            [
                Uuid::now_v7().into(),
                job_id.into(),
                user_id.into(),
                event_type.into(),
            ],
        );

        let result = self
            .connection()
            .execute_raw(stmt)
            .await
            .map_err(|e| AppError::Database(format!("Failed to record credit event: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

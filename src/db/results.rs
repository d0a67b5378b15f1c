//! Database queries for job results.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::entity::job_result::{self, ActiveModel, Entity as JobResult};
use crate::error::{AppError, AppResult};

use super::DbPool;

impl DbPool {
    /// Get the result row for a job.
    pub async fn get_result(&self, job_id: Uuid) -> AppResult<Option<job_result::Model>> {
        let result = JobResult::find_by_id(job_id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get result: {}", e)))?;

        Ok(result)
    }

    /// Write the result row for a job.
    ///
    /// Re-materialization overwrites the derived content; the metadata still
    /// carries the same `full_result`, so repeated calls converge.
    pub async fn upsert_result(
        &self,
        job_id: Uuid,
        html_content: String,
        metadata: JsonValue,
    ) -> AppResult<job_result::Model> {
        let now = Utc::now();

        match self.get_result(job_id).await? {
            Some(existing) => {
                let mut active: ActiveModel = existing.into();
                active.html_content = Set(html_content);
                active.metadata = Set(metadata);
                active.updated_at = Set(now);

                let result = active
                    .update(self.connection())
                    .await
                    .map_err(|e| AppError::Database(format!("Failed to update result: {}", e)))?;

                Ok(result)
            }
            None => {
                let model = ActiveModel {
                    job_id: Set(job_id),
                    html_content: Set(html_content),
                    metadata: Set(metadata),
                    created_at: Set(now),
                    updated_at: Set(now),
                };

                let result = model
                    .insert(self.connection())
                    .await
                    .map_err(|e| AppError::Database(format!("Failed to insert result: {}", e)))?;

                Ok(result)
            }
        }
    }
}

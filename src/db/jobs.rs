//! Database queries for jobs.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::entity::job::{self, ActiveModel, Entity as Job};
use crate::error::{AppError, AppResult};
use crate::models::{CreateJobRequest, JobStatus, QueryJobsParams, TargetApproach};

use super::DbPool;

impl DbPool {
    /// Insert a new job in `pending` state.
    pub async fn insert_job(
        &self,
        id: Uuid,
        execution_id: Option<String>,
        req: &CreateJobRequest,
        approach: TargetApproach,
    ) -> AppResult<job::Model> {
        let now = Utc::now();

        let model = ActiveModel {
            id: Set(id),
            user_id: Set(req.user_id.clone()),
            execution_id: Set(execution_id),
            status: Set(JobStatus::Pending.as_str().to_string()),
            progress: Set(0),
            template_id: Set(req.template_id.clone()),
            advertorial_type: Set(req.advertorial_type.clone()),
            target_approach: Set(approach.as_str().to_string()),
            title: Set(req.title.clone()),
            sales_page_url: Set(req.sales_page_url.clone()),
            avatars: Set(None),
            product_image: Set(None),
            result: Set(None),
            artifact_error: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert job: {}", e)))?;

        Ok(result)
    }

    /// Get a job by ID.
    pub async fn get_job_by_id(&self, id: Uuid) -> AppResult<Option<job::Model>> {
        let result = Job::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get job: {}", e)))?;

        Ok(result)
    }

    /// Update job status and progress.
    ///
    /// `progress: None` leaves the persisted progress untouched (FAILED keeps
    /// whatever the job last reported).
    pub async fn update_job_status(
        &self,
        id: Uuid,
        status: JobStatus,
        progress: Option<i32>,
    ) -> AppResult<job::Model> {
        let job = self
            .get_job_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {}", id)))?;

        let mut active: ActiveModel = job.into();
        active.status = Set(status.as_str().to_string());
        if let Some(progress) = progress {
            active.progress = Set(progress.clamp(0, 100));
        }
        active.updated_at = Set(Utc::now());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update job status: {}", e)))?;

        Ok(result)
    }

    /// Persist materialized v2 artifacts (avatars, product screenshot) onto
    /// the job row.
    pub async fn update_job_materialized(
        &self,
        id: Uuid,
        avatars: Option<JsonValue>,
        product_image: Option<String>,
    ) -> AppResult<job::Model> {
        let job = self
            .get_job_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {}", id)))?;

        let mut active: ActiveModel = job.into();
        if avatars.is_some() {
            active.avatars = Set(avatars);
        }
        if product_image.is_some() {
            active.product_image = Set(product_image);
        }
        active.updated_at = Set(Utc::now());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update job artifacts: {}", e)))?;

        Ok(result)
    }

    /// Record (or clear) the last artifact-generation failure.
    pub async fn set_job_artifact_error(
        &self,
        id: Uuid,
        error: Option<String>,
    ) -> AppResult<job::Model> {
        let job = self
            .get_job_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {}", id)))?;

        let mut active: ActiveModel = job.into();
        active.artifact_error = Set(error);
        active.updated_at = Set(Utc::now());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update artifact error: {}", e)))?;

        Ok(result)
    }

    /// Cache a raw remote result payload on the job row (manual reprocess).
    pub async fn cache_job_result(&self, id: Uuid, payload: JsonValue) -> AppResult<job::Model> {
        let job = self
            .get_job_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {}", id)))?;

        let mut active: ActiveModel = job.into();
        active.result = Set(Some(payload));
        active.updated_at = Set(Utc::now());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to cache job result: {}", e)))?;

        Ok(result)
    }

    /// Query jobs with filtering and pagination.
    pub async fn query_jobs(&self, query: &QueryJobsParams) -> AppResult<(Vec<job::Model>, u64)> {
        let mut select = Job::find();

        if let Some(ref user_id) = query.user_id {
            select = select.filter(job::Column::UserId.eq(user_id));
        }

        if let Some(ref status) = query.status {
            select = select.filter(job::Column::Status.eq(status.as_str()));
        }

        if let Some(ref advertorial_type) = query.advertorial_type {
            select = select.filter(job::Column::AdvertorialType.eq(advertorial_type));
        }

        if let Some(ref from_date) = query.from_date {
            select = select.filter(job::Column::CreatedAt.gte(*from_date));
        }

        if let Some(ref to_date) = query.to_date {
            select = select.filter(job::Column::CreatedAt.lte(*to_date));
        }

        // Count total before pagination
        let total = select
            .clone()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count jobs: {}", e)))?;

        let limit = query.limit.clamp(1, 100) as u64;
        let offset = query.offset.max(0) as u64;

        let jobs = select
            .order_by_desc(job::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to query jobs: {}", e)))?;

        Ok((jobs, total))
    }
}

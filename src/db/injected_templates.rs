//! Database queries for injected templates.

use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Statement,
};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::entity::injected_template::{self, Entity as InjectedTemplate};
use crate::error::{AppError, AppResult};

use super::DbPool;

impl DbPool {
    /// Count injected templates for a job. Zero means "not yet generated".
    pub async fn count_injected_templates(&self, job_id: Uuid) -> AppResult<u64> {
        let count = InjectedTemplate::find()
            .filter(injected_template::Column::JobId.eq(job_id))
            .count(self.connection())
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to count injected templates: {}", e))
            })?;

        Ok(count)
    }

    /// List injected templates for a job, ordered by angle index.
    pub async fn get_injected_templates(
        &self,
        job_id: Uuid,
    ) -> AppResult<Vec<injected_template::Model>> {
        let result = InjectedTemplate::find()
            .filter(injected_template::Column::JobId.eq(job_id))
            .order_by_asc(injected_template::Column::AngleIndex)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get injected templates: {}", e)))?;

        Ok(result)
    }

    /// Insert one injected template row.
    ///
    /// `(job_id, angle_index)` is unique; a concurrent writer that got there
    /// first wins and this insert reports `false` (already generated, skip).
    pub async fn insert_injected_template(
        &self,
        id: Uuid,
        job_id: Uuid,
        angle_index: i32,
        angle_name: &str,
        html_content: &str,
        template_id: &str,
        config_data: Option<JsonValue>,
    ) -> AppResult<bool> {
        let stmt = Statement::from_sql_and_values(
            sea_orm::DatabaseBackend::Postgres,
            "INSERT INTO injected_templates \
             (id, job_id, angle_index, angle_name, html_content, template_id, config_data, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, NOW()) \
             ON CONFLICT (job_id, angle_index) DO NOTHING",
            [
                id.into(),
                job_id.into(),
                angle_index.into(),
                angle_name.into(),
                html_content.into(),
                template_id.into(),
                config_data.into(),
            ],
        );

        let result = self
            .connection()
            .execute_raw(stmt)
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert injected template: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

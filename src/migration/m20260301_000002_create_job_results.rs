//! Migration: Create job_results table.
//!
//! One row per job; metadata.full_result keeps the unmodified remote payload.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE job_results (
                    job_id UUID PRIMARY KEY REFERENCES jobs(id) ON DELETE CASCADE,

                    -- Generated HTML summary (v1); empty string for v2 jobs
                    html_content TEXT NOT NULL DEFAULT '',

                    -- {deepcopy_job_id, full_result, project_name, timestamp,
                    --  api_version, generated_at, html_templates_count}
                    metadata JSONB NOT NULL,

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                -- Trigger to update updated_at
                CREATE TRIGGER update_job_results_updated_at
                    BEFORE UPDATE ON job_results
                    FOR EACH ROW
                    EXECUTE FUNCTION update_updated_at_column();
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DROP TRIGGER IF EXISTS update_job_results_updated_at ON job_results;
                DROP TABLE IF EXISTS job_results CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}

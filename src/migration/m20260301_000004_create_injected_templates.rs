//! Migration: Create injected_templates table.
//!
//! One row per marketing angle of a completed job.

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
                CREATE TABLE injected_templates (
                    id UUID PRIMARY KEY,
                    job_id UUID NOT NULL REFERENCES jobs(id) ON DELETE CASCADE,

                    -- 1-based position in the payload's swipe_results array
                    angle_index INTEGER NOT NULL CHECK (angle_index >= 1),
                    angle_name VARCHAR(500) NOT NULL,

                    -- Fully materialized HTML after placeholder substitution
                    html_content TEXT NOT NULL,

                    template_id VARCHAR(100) NOT NULL,

                    -- Structured content map used for injection
                    config_data JSONB,

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                -- Index for per-job listing
                CREATE INDEX idx_injected_templates_job_id ON injected_templates(job_id);

                -- Concurrent reconcile calls may both attempt generation;
                -- first insert wins, later ones conflict-skip
                CREATE UNIQUE INDEX idx_injected_templates_job_angle
                    ON injected_templates(job_id, angle_index);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS injected_templates CASCADE;")
            .await?;

        Ok(())
    }
}

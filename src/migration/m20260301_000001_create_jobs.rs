//! Migration: Create jobs table and shared trigger function.
//!
//! Jobs track one DeepCopy generation run from submission to completion.
//! Also creates the shared updated_at trigger function.

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
                -- Shared trigger function for updated_at
                CREATE OR REPLACE FUNCTION update_updated_at_column()
                RETURNS TRIGGER AS $$
                BEGIN
                    NEW.updated_at = NOW();
                    RETURN NEW;
                END;
                $$ LANGUAGE plpgsql;

                -- Jobs table
                CREATE TABLE jobs (
                    id UUID PRIMARY KEY, -- UUIDv7 for time-ordered sorting
                    user_id VARCHAR(100) NOT NULL,

                    -- Remote DeepCopy execution id; NULL for jobs whose own id
                    -- is the remote id (older creation convention)
                    execution_id VARCHAR(100),

                    status VARCHAR(20) NOT NULL DEFAULT 'pending'
                        CHECK (status IN ('pending', 'processing', 'completed', 'failed')),
                    progress INTEGER NOT NULL DEFAULT 0
                        CHECK (progress >= 0 AND progress <= 100),

                    template_id VARCHAR(100),
                    advertorial_type VARCHAR(50) NOT NULL,
                    target_approach VARCHAR(10) NOT NULL DEFAULT 'v2'
                        CHECK (target_approach IN ('v1', 'v2')),

                    title VARCHAR(500) NOT NULL,
                    sales_page_url VARCHAR(2000) NOT NULL,

                    -- Materialized v2 artifacts
                    avatars JSONB,
                    product_image VARCHAR(2000),

                    -- Raw remote payload cached by the manual reprocess endpoint
                    result JSONB,

                    -- Last materialization/injection failure (observability)
                    artifact_error TEXT,

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                -- Index for per-user listing
                CREATE INDEX idx_jobs_user_id ON jobs(user_id);

                -- Index for status queries
                CREATE INDEX idx_jobs_status ON jobs(status);

                -- Index for listing by creation date
                CREATE INDEX idx_jobs_created_at ON jobs(created_at DESC);

                -- Lookup by remote execution id during reconciliation
                CREATE INDEX idx_jobs_execution_id ON jobs(execution_id)
                    WHERE execution_id IS NOT NULL;

                -- Trigger to update updated_at
                CREATE TRIGGER update_jobs_updated_at
                    BEFORE UPDATE ON jobs
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
                DROP TRIGGER IF EXISTS update_jobs_updated_at ON jobs;
                DROP TABLE IF EXISTS jobs CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}

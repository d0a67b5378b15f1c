//! Migration: Create credit_events table.
//!
//! One usage event per completed job; unique (job_id, event_type) keeps the
//! recorder idempotent.

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
                CREATE TABLE credit_events (
                    id UUID PRIMARY KEY,
                    job_id UUID NOT NULL REFERENCES jobs(id) ON DELETE CASCADE,
                    user_id VARCHAR(100) NOT NULL,
                    event_type VARCHAR(50) NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                -- Index for per-user accounting
                CREATE INDEX idx_credit_events_user_id ON credit_events(user_id);

                -- One event of a given type per job
                CREATE UNIQUE INDEX idx_credit_events_job_type
                    ON credit_events(job_id, event_type);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS credit_events CASCADE;")
            .await?;

        Ok(())
    }
}

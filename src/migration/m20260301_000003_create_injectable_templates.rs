//! Migration: Create injectable_templates table.
//!
//! Reference data: template HTML with named placeholders, seeded out of band.

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
                CREATE TABLE injectable_templates (
                    id VARCHAR(100) PRIMARY KEY,
                    name VARCHAR(200) NOT NULL,
                    advertorial_type VARCHAR(50) NOT NULL,

                    -- Template HTML with {{placeholder}} slots
                    html TEXT NOT NULL,

                    -- Optional per-field image-prompt metadata
                    field_config JSONB,

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                -- Fallback resolution: newest template of an advertorial type
                CREATE INDEX idx_injectable_templates_type_created
                    ON injectable_templates(advertorial_type, created_at DESC);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS injectable_templates CASCADE;")
            .await?;

        Ok(())
    }
}

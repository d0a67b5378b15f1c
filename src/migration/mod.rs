//! SeaORM database migrations.

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_jobs;
mod m20260301_000002_create_job_results;
mod m20260301_000003_create_injectable_templates;
mod m20260301_000004_create_injected_templates;
mod m20260301_000005_create_credit_events;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_jobs::Migration),
            Box::new(m20260301_000002_create_job_results::Migration),
            Box::new(m20260301_000003_create_injectable_templates::Migration),
            Box::new(m20260301_000004_create_injected_templates::Migration),
            Box::new(m20260301_000005_create_credit_events::Migration),
        ]
    }
}

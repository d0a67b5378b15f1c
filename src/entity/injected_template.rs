//! Injected template entity for SeaORM.
//!
//! One row per marketing angle of a completed job. `(job_id, angle_index)` is
//! unique; concurrent generation resolves via insert-conflict skip.

use sea_orm::entity::prelude::*;
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "injected_templates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub job_id: Uuid,
    /// 1-based position of the angle in the swipe_results array
    pub angle_index: i32,
    pub angle_name: String,
    /// Fully materialized HTML after placeholder substitution
    pub html_content: String,
    pub template_id: String,
    /// Structured content map used for injection, kept for re-rendering
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub config_data: Option<JsonValue>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::job::Entity",
        from = "Column::JobId",
        to = "super::job::Column::Id",
        on_delete = "Cascade"
    )]
    Job,
}

impl Related<super::job::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Job.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

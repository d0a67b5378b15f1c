//! Job entity for SeaORM.

use sea_orm::entity::prelude::*;
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "jobs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Owning user, carried through to credit events
    pub user_id: String,
    /// Remote DeepCopy execution id. Older jobs used their own id as the
    /// remote id and leave this NULL.
    pub execution_id: Option<String>,
    /// Local status: pending, processing, completed, failed
    pub status: String,
    /// Progress percentage 0-100
    pub progress: i32,
    pub template_id: Option<String>,
    pub advertorial_type: String,
    /// DeepCopy API version: v1 or v2
    pub target_approach: String,
    pub title: String,
    pub sales_page_url: String,
    /// Customer avatars in the application schema (v2 jobs only)
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub avatars: Option<JsonValue>,
    /// Product screenshot URL extracted from the v2 payload
    pub product_image: Option<String>,
    /// Raw remote payload cached by the manual reprocess endpoint
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub result: Option<JsonValue>,
    /// Last materialization/injection failure, kept for observability
    pub artifact_error: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::job_result::Entity")]
    JobResult,
    #[sea_orm(has_many = "super::injected_template::Entity")]
    InjectedTemplates,
    #[sea_orm(has_many = "super::credit_event::Entity")]
    CreditEvents,
}

impl Related<super::job_result::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobResult.def()
    }
}

impl Related<super::injected_template::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InjectedTemplates.def()
    }
}

impl Related<super::credit_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreditEvents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

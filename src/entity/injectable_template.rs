//! Injectable template entity for SeaORM.
//!
//! Reference data: raw HTML with `{{placeholder}}` slots, selected per job by
//! template id or advertorial type.

use sea_orm::entity::prelude::*;
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "injectable_templates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub advertorial_type: String,
    /// Template HTML with named placeholders, e.g. `{{headline}}`
    pub html: String,
    /// Optional per-field image-prompt metadata
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub field_config: Option<JsonValue>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

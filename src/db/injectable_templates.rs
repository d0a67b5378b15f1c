//! Database queries for injectable templates (reference data).

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::entity::injectable_template::{self, Entity as InjectableTemplate};
use crate::error::{AppError, AppResult};

use super::DbPool;

impl DbPool {
    /// Get an injectable template by exact id.
    pub async fn get_injectable_template(
        &self,
        id: &str,
    ) -> AppResult<Option<injectable_template::Model>> {
        let result = InjectableTemplate::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get injectable template: {}", e)))?;

        Ok(result)
    }

    /// Most recently created injectable template for an advertorial type.
    pub async fn latest_injectable_template_for_type(
        &self,
        advertorial_type: &str,
    ) -> AppResult<Option<injectable_template::Model>> {
        let result = InjectableTemplate::find()
            .filter(injectable_template::Column::AdvertorialType.eq(advertorial_type))
            .order_by_desc(injectable_template::Column::CreatedAt)
            .one(self.connection())
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to find template for type: {}", e))
            })?;

        Ok(result)
    }
}

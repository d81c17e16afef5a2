use super::{
    find_or_not_found, normalize_string, validate_decimal_non_negative, validate_not_blank,
};
use crate::{
    db::SearchBuilder,
    entities::{invoice_line, labor_rate, InvoiceLine, LaborRate, LaborRateModel},
    errors::ServiceError,
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct LaborRateInput {
    #[validate(custom = "validate_not_blank")]
    pub description: String,
    #[validate(custom = "validate_decimal_non_negative")]
    pub hourly_rate: Decimal,
}

#[derive(Clone)]
pub struct LaborRateService {
    db: Arc<DatabaseConnection>,
}

impl LaborRateService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: LaborRateInput) -> Result<LaborRateModel, ServiceError> {
        input.validate()?;

        let model = labor_rate::ActiveModel {
            description: Set(normalize_string(input.description)),
            hourly_rate: Set(input.hourly_rate),
            ..Default::default()
        };
        let created = model.insert(&*self.db).await?;

        info!(labor_rate_id = created.id, "Labor rate created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn list(&self, q: Option<&str>) -> Result<Vec<LaborRateModel>, ServiceError> {
        let mut query = LaborRate::find();
        if let Some(condition) = SearchBuilder::for_connection(&*self.db)
            .add_like(labor_rate::Column::Description, q.unwrap_or_default())
            .build()
        {
            query = query.filter(condition);
        }

        Ok(query
            .order_by_asc(labor_rate::Column::Id)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<LaborRateModel, ServiceError> {
        find_or_not_found::<LaborRate, _>(&*self.db, id, "Labor rate").await
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i32,
        input: LaborRateInput,
    ) -> Result<LaborRateModel, ServiceError> {
        input.validate()?;

        let mut model: labor_rate::ActiveModel = self.get(id).await?.into();
        model.description = Set(normalize_string(input.description));
        model.hourly_rate = Set(input.hourly_rate);
        let updated = model.update(&*self.db).await?;

        info!(labor_rate_id = id, "Labor rate updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let existing = self.get(id).await?;

        let uses = InvoiceLine::find()
            .filter(invoice_line::Column::LaborRateId.eq(id))
            .count(&*self.db)
            .await?;
        if uses > 0 {
            return Err(ServiceError::Conflict(format!(
                "Labor rate {} is used on {} invoice line(s) and cannot be deleted",
                id, uses
            )));
        }

        existing.delete(&*self.db).await?;
        info!(labor_rate_id = id, "Labor rate deleted");
        Ok(())
    }
}

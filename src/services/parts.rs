use super::{
    find_or_not_found, normalize_optional_string, normalize_string, validate_decimal_non_negative,
    validate_not_blank,
};
use crate::{
    db::SearchBuilder,
    entities::{invoice_line, part, InvoiceLine, Part, PartModel, Supplier},
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
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

const SEARCH_COLUMNS: [part::Column; 3] = [
    part::Column::Designation,
    part::Column::Reference,
    part::Column::Category,
];

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct PartInput {
    #[validate(custom = "validate_not_blank")]
    pub designation: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    #[validate(custom = "validate_decimal_non_negative")]
    pub purchase_price: Option<Decimal>,
    #[validate(custom = "validate_decimal_non_negative")]
    pub sale_price: Decimal,
    #[serde(default)]
    pub category: Option<String>,
    /// Must reference an existing supplier when given
    #[serde(default)]
    pub supplier_id: Option<i32>,
}

/// Separate criteria, AND-combined
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PartSearch {
    pub designation: Option<String>,
    pub reference: Option<String>,
}

#[derive(Clone)]
pub struct PartService {
    db: Arc<DatabaseConnection>,
}

impl PartService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: PartInput) -> Result<PartModel, ServiceError> {
        input.validate()?;
        self.ensure_supplier_exists(input.supplier_id).await?;

        let mut model = part::ActiveModel {
            ..Default::default()
        };
        apply_input(&mut model, input);
        let created = model.insert(&*self.db).await?;

        info!(part_id = created.id, "Part created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn list(&self, q: Option<&str>) -> Result<Vec<PartModel>, ServiceError> {
        let mut query = Part::find();
        if let Some(condition) = SearchBuilder::for_connection(&*self.db)
            .add_like_any(SEARCH_COLUMNS, q.unwrap_or_default())
            .build()
        {
            query = query.filter(condition);
        }

        Ok(query.order_by_asc(part::Column::Id).all(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn search(&self, criteria: PartSearch) -> Result<Vec<PartModel>, ServiceError> {
        let mut query = Part::find();
        if let Some(condition) = SearchBuilder::for_connection(&*self.db)
            .add_like(
                part::Column::Designation,
                criteria.designation.as_deref().unwrap_or_default(),
            )
            .add_like(
                part::Column::Reference,
                criteria.reference.as_deref().unwrap_or_default(),
            )
            .build_all()
        {
            query = query.filter(condition);
        }

        Ok(query.order_by_asc(part::Column::Id).all(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<PartModel, ServiceError> {
        find_or_not_found::<Part, _>(&*self.db, id, "Part").await
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i32, input: PartInput) -> Result<PartModel, ServiceError> {
        input.validate()?;

        let existing = self.get(id).await?;
        self.ensure_supplier_exists(input.supplier_id).await?;

        let mut model: part::ActiveModel = existing.into();
        apply_input(&mut model, input);
        let updated = model.update(&*self.db).await?;

        info!(part_id = id, "Part updated");
        Ok(updated)
    }

    /// Refused while an invoice line bills the part
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let existing = self.get(id).await?;

        let uses = InvoiceLine::find()
            .filter(invoice_line::Column::PartId.eq(id))
            .count(&*self.db)
            .await?;
        if uses > 0 {
            return Err(ServiceError::Conflict(format!(
                "Part {} is used on {} invoice line(s) and cannot be deleted",
                id, uses
            )));
        }

        existing.delete(&*self.db).await?;
        info!(part_id = id, "Part deleted");
        Ok(())
    }

    async fn ensure_supplier_exists(&self, supplier_id: Option<i32>) -> Result<(), ServiceError> {
        if let Some(supplier_id) = supplier_id {
            find_or_not_found::<Supplier, _>(&*self.db, supplier_id, "Supplier").await?;
        }
        Ok(())
    }
}

fn apply_input(model: &mut part::ActiveModel, input: PartInput) {
    model.designation = Set(normalize_string(input.designation));
    model.reference = Set(normalize_optional_string(input.reference));
    model.purchase_price = Set(input.purchase_price);
    model.sale_price = Set(input.sale_price);
    model.category = Set(normalize_optional_string(input.category));
    model.supplier_id = Set(input.supplier_id);
}

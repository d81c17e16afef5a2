use super::{
    find_or_not_found, normalize_optional_string, normalize_string, validate_not_blank,
    validate_percentage,
};
use crate::{
    db::SearchBuilder,
    entities::{
        part, supplier, supplier_discount, Part, Supplier, SupplierDiscount,
        SupplierDiscountModel, SupplierModel,
    },
    errors::ServiceError,
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

const SEARCH_COLUMNS: [supplier::Column; 3] = [
    supplier::Column::Name,
    supplier::Column::ContactPerson,
    supplier::Column::Email,
];

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct SupplierInput {
    #[validate(custom = "validate_not_blank")]
    pub name: String,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub average_delivery_days: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct DiscountInput {
    #[validate(custom = "validate_not_blank")]
    pub part_category: String,
    /// Between 0 and 100
    #[validate(custom = "validate_percentage")]
    pub discount_percent: Decimal,
}

#[derive(Clone)]
pub struct SupplierService {
    db: Arc<DatabaseConnection>,
}

impl SupplierService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: SupplierInput) -> Result<SupplierModel, ServiceError> {
        input.validate()?;
        ensure_name_available(&*self.db, input.name.trim(), None).await?;

        let mut model = supplier::ActiveModel {
            ..Default::default()
        };
        apply_input(&mut model, input);
        let created = model.insert(&*self.db).await?;

        info!(supplier_id = created.id, "Supplier created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn list(&self, q: Option<&str>) -> Result<Vec<SupplierModel>, ServiceError> {
        let mut query = Supplier::find();
        if let Some(condition) = SearchBuilder::for_connection(&*self.db)
            .add_like_any(SEARCH_COLUMNS, q.unwrap_or_default())
            .build()
        {
            query = query.filter(condition);
        }

        Ok(query
            .order_by_asc(supplier::Column::Id)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<SupplierModel, ServiceError> {
        find_or_not_found::<Supplier, _>(&*self.db, id, "Supplier").await
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i32,
        input: SupplierInput,
    ) -> Result<SupplierModel, ServiceError> {
        input.validate()?;

        let existing = self.get(id).await?;
        ensure_name_available(&*self.db, input.name.trim(), Some(id)).await?;

        let mut model: supplier::ActiveModel = existing.into();
        apply_input(&mut model, input);
        let updated = model.update(&*self.db).await?;

        info!(supplier_id = id, "Supplier updated");
        Ok(updated)
    }

    /// Removes the supplier and its discounts. Refused while parts reference it.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let existing = self.get(id).await?;

        let parts = Part::find()
            .filter(part::Column::SupplierId.eq(id))
            .count(&*self.db)
            .await?;
        if parts > 0 {
            return Err(ServiceError::Conflict(format!(
                "Supplier {} still supplies {} part(s) and cannot be deleted",
                id, parts
            )));
        }

        let txn = self.db.begin().await?;
        SupplierDiscount::delete_many()
            .filter(supplier_discount::Column::SupplierId.eq(id))
            .exec(&txn)
            .await?;
        existing.delete(&txn).await?;
        txn.commit().await?;

        info!(supplier_id = id, "Supplier deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_discounts(
        &self,
        supplier_id: i32,
    ) -> Result<Vec<SupplierDiscountModel>, ServiceError> {
        self.get(supplier_id).await?;

        Ok(SupplierDiscount::find()
            .filter(supplier_discount::Column::SupplierId.eq(supplier_id))
            .order_by_asc(supplier_discount::Column::Id)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self, input))]
    pub async fn create_discount(
        &self,
        supplier_id: i32,
        input: DiscountInput,
    ) -> Result<SupplierDiscountModel, ServiceError> {
        input.validate()?;
        self.get(supplier_id).await?;

        let model = supplier_discount::ActiveModel {
            supplier_id: Set(supplier_id),
            part_category: Set(normalize_string(input.part_category)),
            discount_percent: Set(input.discount_percent),
            ..Default::default()
        };
        let created = model.insert(&*self.db).await?;

        info!(
            supplier_id,
            discount_id = created.id,
            "Supplier discount created"
        );
        Ok(created)
    }

    #[instrument(skip(self, input))]
    pub async fn update_discount(
        &self,
        discount_id: i32,
        input: DiscountInput,
    ) -> Result<SupplierDiscountModel, ServiceError> {
        input.validate()?;

        let existing = find_or_not_found::<SupplierDiscount, _>(
            &*self.db,
            discount_id,
            "Supplier discount",
        )
        .await?;
        let mut model: supplier_discount::ActiveModel = existing.into();
        model.part_category = Set(normalize_string(input.part_category));
        model.discount_percent = Set(input.discount_percent);

        Ok(model.update(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_discount(&self, discount_id: i32) -> Result<(), ServiceError> {
        let existing = find_or_not_found::<SupplierDiscount, _>(
            &*self.db,
            discount_id,
            "Supplier discount",
        )
        .await?;
        existing.delete(&*self.db).await?;

        info!(discount_id, "Supplier discount deleted");
        Ok(())
    }
}

/// Supplier names are unique; `exclude` skips the row being updated
async fn ensure_name_available<C: ConnectionTrait>(
    db: &C,
    name: &str,
    exclude: Option<i32>,
) -> Result<(), ServiceError> {
    let mut query = Supplier::find().filter(supplier::Column::Name.eq(name));
    if let Some(id) = exclude {
        query = query.filter(supplier::Column::Id.ne(id));
    }

    if query.count(db).await? > 0 {
        return Err(ServiceError::Conflict(format!(
            "Supplier name '{}' already exists",
            name
        )));
    }
    Ok(())
}

fn apply_input(model: &mut supplier::ActiveModel, input: SupplierInput) {
    model.name = Set(normalize_string(input.name));
    model.contact_person = Set(normalize_optional_string(input.contact_person));
    model.phone = Set(normalize_optional_string(input.phone));
    model.email = Set(normalize_optional_string(input.email));
    model.address = Set(normalize_optional_string(input.address));
    model.average_delivery_days = Set(input.average_delivery_days);
}

use super::{find_or_not_found, normalize_string, validate_not_blank};
use crate::{
    db::SearchBuilder,
    entities::{technician, Technician, TechnicianModel},
    errors::ServiceError,
};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

const SEARCH_COLUMNS: [technician::Column; 4] = [
    technician::Column::LastName,
    technician::Column::FirstName,
    technician::Column::TechnicianNumber,
    technician::Column::Email,
];

/// All technician fields are mandatory
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct TechnicianInput {
    #[validate(custom = "validate_not_blank")]
    pub last_name: String,
    #[validate(custom = "validate_not_blank")]
    pub first_name: String,
    #[validate(custom = "validate_not_blank")]
    pub address: String,
    #[validate(custom = "validate_not_blank")]
    pub postal_code: String,
    #[validate(custom = "validate_not_blank")]
    pub city: String,
    pub birth_date: NaiveDate,
    #[validate(email)]
    pub email: String,
    #[validate(custom = "validate_not_blank")]
    pub phone: String,
    #[validate(custom = "validate_not_blank")]
    pub technician_number: String,
}

#[derive(Clone)]
pub struct TechnicianService {
    db: Arc<DatabaseConnection>,
}

impl TechnicianService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: TechnicianInput) -> Result<TechnicianModel, ServiceError> {
        input.validate()?;
        ensure_number_available(&*self.db, input.technician_number.trim(), None).await?;

        let mut model = technician::ActiveModel {
            ..Default::default()
        };
        apply_input(&mut model, input);
        let created = model.insert(&*self.db).await?;

        info!(technician_id = created.id, "Technician created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn list(&self, q: Option<&str>) -> Result<Vec<TechnicianModel>, ServiceError> {
        let mut query = Technician::find();
        if let Some(condition) = SearchBuilder::for_connection(&*self.db)
            .add_like_any(SEARCH_COLUMNS, q.unwrap_or_default())
            .build()
        {
            query = query.filter(condition);
        }

        Ok(query
            .order_by_asc(technician::Column::Id)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<TechnicianModel, ServiceError> {
        find_or_not_found::<Technician, _>(&*self.db, id, "Technician").await
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i32,
        input: TechnicianInput,
    ) -> Result<TechnicianModel, ServiceError> {
        input.validate()?;

        let existing = self.get(id).await?;
        ensure_number_available(&*self.db, input.technician_number.trim(), Some(id)).await?;

        let mut model: technician::ActiveModel = existing.into();
        apply_input(&mut model, input);
        let updated = model.update(&*self.db).await?;

        info!(technician_id = id, "Technician updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.get(id).await?.delete(&*self.db).await?;
        info!(technician_id = id, "Technician deleted");
        Ok(())
    }
}

async fn ensure_number_available<C: ConnectionTrait>(
    db: &C,
    number: &str,
    exclude: Option<i32>,
) -> Result<(), ServiceError> {
    let mut query = Technician::find().filter(technician::Column::TechnicianNumber.eq(number));
    if let Some(id) = exclude {
        query = query.filter(technician::Column::Id.ne(id));
    }

    if query.count(db).await? > 0 {
        return Err(ServiceError::Conflict(format!(
            "Technician number '{}' already exists",
            number
        )));
    }
    Ok(())
}

fn apply_input(model: &mut technician::ActiveModel, input: TechnicianInput) {
    model.last_name = Set(normalize_string(input.last_name));
    model.first_name = Set(normalize_string(input.first_name));
    model.address = Set(normalize_string(input.address));
    model.postal_code = Set(normalize_string(input.postal_code));
    model.city = Set(normalize_string(input.city));
    model.birth_date = Set(input.birth_date);
    model.email = Set(normalize_string(input.email));
    model.phone = Set(normalize_string(input.phone));
    model.technician_number = Set(normalize_string(input.technician_number));
}

//! Insurers and experts: standalone address-book records with no dependents.

use super::{find_or_not_found, normalize_optional_string, normalize_string, validate_not_blank};
use crate::{
    db::SearchBuilder,
    entities::{expert, insurer, Expert, ExpertModel, Insurer, InsurerModel},
    errors::ServiceError,
};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct InsurerInput {
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
    pub average_payment_days: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct ExpertInput {
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
    pub average_response_days: Option<i32>,
}

#[derive(Clone)]
pub struct InsurerService {
    db: Arc<DatabaseConnection>,
}

impl InsurerService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: InsurerInput) -> Result<InsurerModel, ServiceError> {
        input.validate()?;

        let mut model = insurer::ActiveModel {
            ..Default::default()
        };
        apply_insurer(&mut model, input);
        let created = model.insert(&*self.db).await?;

        info!(insurer_id = created.id, "Insurer created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn list(&self, q: Option<&str>) -> Result<Vec<InsurerModel>, ServiceError> {
        let mut query = Insurer::find();
        if let Some(condition) = SearchBuilder::for_connection(&*self.db)
            .add_like_any(
                [
                    insurer::Column::Name,
                    insurer::Column::ContactPerson,
                    insurer::Column::Email,
                ],
                q.unwrap_or_default(),
            )
            .build()
        {
            query = query.filter(condition);
        }

        Ok(query
            .order_by_asc(insurer::Column::Id)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<InsurerModel, ServiceError> {
        find_or_not_found::<Insurer, _>(&*self.db, id, "Insurer").await
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i32, input: InsurerInput) -> Result<InsurerModel, ServiceError> {
        input.validate()?;

        let mut model: insurer::ActiveModel = self.get(id).await?.into();
        apply_insurer(&mut model, input);
        let updated = model.update(&*self.db).await?;

        info!(insurer_id = id, "Insurer updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.get(id).await?.delete(&*self.db).await?;
        info!(insurer_id = id, "Insurer deleted");
        Ok(())
    }
}

#[derive(Clone)]
pub struct ExpertService {
    db: Arc<DatabaseConnection>,
}

impl ExpertService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: ExpertInput) -> Result<ExpertModel, ServiceError> {
        input.validate()?;

        let mut model = expert::ActiveModel {
            ..Default::default()
        };
        apply_expert(&mut model, input);
        let created = model.insert(&*self.db).await?;

        info!(expert_id = created.id, "Expert created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn list(&self, q: Option<&str>) -> Result<Vec<ExpertModel>, ServiceError> {
        let mut query = Expert::find();
        if let Some(condition) = SearchBuilder::for_connection(&*self.db)
            .add_like_any(
                [
                    expert::Column::Name,
                    expert::Column::ContactPerson,
                    expert::Column::Email,
                ],
                q.unwrap_or_default(),
            )
            .build()
        {
            query = query.filter(condition);
        }

        Ok(query
            .order_by_asc(expert::Column::Id)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<ExpertModel, ServiceError> {
        find_or_not_found::<Expert, _>(&*self.db, id, "Expert").await
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i32, input: ExpertInput) -> Result<ExpertModel, ServiceError> {
        input.validate()?;

        let mut model: expert::ActiveModel = self.get(id).await?.into();
        apply_expert(&mut model, input);
        let updated = model.update(&*self.db).await?;

        info!(expert_id = id, "Expert updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.get(id).await?.delete(&*self.db).await?;
        info!(expert_id = id, "Expert deleted");
        Ok(())
    }
}

fn apply_insurer(model: &mut insurer::ActiveModel, input: InsurerInput) {
    model.name = Set(normalize_string(input.name));
    model.contact_person = Set(normalize_optional_string(input.contact_person));
    model.phone = Set(normalize_optional_string(input.phone));
    model.email = Set(normalize_optional_string(input.email));
    model.address = Set(normalize_optional_string(input.address));
    model.average_payment_days = Set(input.average_payment_days);
}

fn apply_expert(model: &mut expert::ActiveModel, input: ExpertInput) {
    model.name = Set(normalize_string(input.name));
    model.contact_person = Set(normalize_optional_string(input.contact_person));
    model.phone = Set(normalize_optional_string(input.phone));
    model.email = Set(normalize_optional_string(input.email));
    model.address = Set(normalize_optional_string(input.address));
    model.average_response_days = Set(input.average_response_days);
}

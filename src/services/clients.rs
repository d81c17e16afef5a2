use super::{find_or_not_found, normalize_optional_string, normalize_string, validate_not_blank};
use crate::{
    db::SearchBuilder,
    entities::{client, invoice, planning_event, Client, ClientModel, Invoice, PlanningEvent},
    errors::ServiceError,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

/// Columns matched by the free-text `q` filter
const SEARCH_COLUMNS: [client::Column; 5] = [
    client::Column::LastName,
    client::Column::FirstName,
    client::Column::Email,
    client::Column::Phone,
    client::Column::City,
];

/// Client fields accepted on create and update
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct ClientInput {
    #[validate(custom = "validate_not_blank")]
    pub last_name: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Structured search; every criterion given must match
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ClientSearch {
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    /// Exact match
    #[serde(default)]
    pub postal_code: Option<String>,
}

#[derive(Clone)]
pub struct ClientService {
    db: Arc<DatabaseConnection>,
}

impl ClientService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: ClientInput) -> Result<ClientModel, ServiceError> {
        input.validate()?;

        let mut model = client::ActiveModel {
            ..Default::default()
        };
        apply_input(&mut model, input);
        let created = model.insert(&*self.db).await?;

        info!(client_id = created.id, "Client created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn list(&self, q: Option<&str>) -> Result<Vec<ClientModel>, ServiceError> {
        let mut query = Client::find();
        if let Some(condition) = SearchBuilder::for_connection(&*self.db)
            .add_like_any(SEARCH_COLUMNS, q.unwrap_or_default())
            .build()
        {
            query = query.filter(condition);
        }

        Ok(query
            .order_by_asc(client::Column::Id)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn search(&self, criteria: ClientSearch) -> Result<Vec<ClientModel>, ServiceError> {
        let mut builder = SearchBuilder::for_connection(&*self.db)
            .add_like(
                client::Column::LastName,
                criteria.last_name.as_deref().unwrap_or_default(),
            )
            .add_like(
                client::Column::FirstName,
                criteria.first_name.as_deref().unwrap_or_default(),
            );
        if let Some(postal_code) = normalize_optional_string(criteria.postal_code) {
            builder = builder.add_eq(client::Column::PostalCode, postal_code);
        }

        let mut query = Client::find();
        if let Some(condition) = builder.build_all() {
            query = query.filter(condition);
        }

        Ok(query
            .order_by_asc(client::Column::Id)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<ClientModel, ServiceError> {
        find_or_not_found::<Client, _>(&*self.db, id, "Client").await
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i32, input: ClientInput) -> Result<ClientModel, ServiceError> {
        input.validate()?;

        let existing = self.get(id).await?;
        let mut model: client::ActiveModel = existing.into();
        apply_input(&mut model, input);
        let updated = model.update(&*self.db).await?;

        info!(client_id = id, "Client updated");
        Ok(updated)
    }

    /// Refused while invoices or planning events still reference the client
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let existing = self.get(id).await?;

        let invoices = Invoice::find()
            .filter(invoice::Column::ClientId.eq(id))
            .count(&*self.db)
            .await?;
        if invoices > 0 {
            return Err(ServiceError::Conflict(format!(
                "Client {} has {} invoice(s) and cannot be deleted",
                id, invoices
            )));
        }

        let events = PlanningEvent::find()
            .filter(planning_event::Column::ClientId.eq(id))
            .count(&*self.db)
            .await?;
        if events > 0 {
            return Err(ServiceError::Conflict(format!(
                "Client {} has {} planning event(s) and cannot be deleted",
                id, events
            )));
        }

        existing.delete(&*self.db).await?;
        info!(client_id = id, "Client deleted");
        Ok(())
    }
}

fn apply_input(model: &mut client::ActiveModel, input: ClientInput) {
    model.last_name = Set(normalize_string(input.last_name));
    model.first_name = Set(normalize_optional_string(input.first_name));
    model.phone = Set(normalize_optional_string(input.phone));
    model.email = Set(normalize_optional_string(input.email));
    model.address = Set(normalize_optional_string(input.address));
    model.postal_code = Set(normalize_optional_string(input.postal_code));
    model.city = Set(normalize_optional_string(input.city));
    model.country = Set(normalize_optional_string(input.country));
}

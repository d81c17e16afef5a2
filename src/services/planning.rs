use super::{find_or_not_found, normalize_string, validate_not_blank};
use crate::{
    db::SearchBuilder,
    entities::{planning_event, Client, PlanningEvent, PlanningEventModel},
    errors::ServiceError,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

const SEARCH_COLUMNS: [planning_event::Column; 3] = [
    planning_event::Column::WorkDescription,
    planning_event::Column::TechnicianName,
    planning_event::Column::CarRegistration,
];

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct PlanningInput {
    pub client_id: i32,
    pub start_at: DateTime<Utc>,
    /// Must not precede `start_at`
    #[serde(default)]
    pub end_at: Option<DateTime<Utc>>,
    #[validate(custom = "validate_not_blank")]
    pub work_description: String,
    #[validate(custom = "validate_not_blank")]
    pub technician_name: String,
    #[validate(custom = "validate_not_blank")]
    pub car_registration: String,
}

impl PlanningInput {
    fn check(&self) -> Result<(), ServiceError> {
        self.validate()?;
        if let Some(end_at) = self.end_at {
            if end_at < self.start_at {
                return Err(ServiceError::ValidationError(
                    "end_at must not be earlier than start_at".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Calendar filters; `from`/`to` bound `start_at` inclusively
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PlanningQuery {
    /// Free-text filter on description, technician and registration
    pub q: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub client_id: Option<i32>,
}

#[derive(Clone)]
pub struct PlanningService {
    db: Arc<DatabaseConnection>,
}

impl PlanningService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: PlanningInput) -> Result<PlanningEventModel, ServiceError> {
        input.check()?;
        find_or_not_found::<Client, _>(&*self.db, input.client_id, "Client").await?;

        let mut model = planning_event::ActiveModel {
            ..Default::default()
        };
        apply_input(&mut model, input);
        let created = model.insert(&*self.db).await?;

        info!(
            event_id = created.id,
            client_id = created.client_id,
            "Planning event created"
        );
        Ok(created)
    }

    /// Events ordered by start time
    #[instrument(skip(self))]
    pub async fn list(&self, filter: PlanningQuery) -> Result<Vec<PlanningEventModel>, ServiceError> {
        if let (Some(from), Some(to)) = (filter.from, filter.to) {
            if from > to {
                return Err(ServiceError::ValidationError(
                    "'from' must not be later than 'to'".to_string(),
                ));
            }
        }

        let mut query = PlanningEvent::find();
        if let Some(condition) = SearchBuilder::for_connection(&*self.db)
            .add_like_any(SEARCH_COLUMNS, filter.q.as_deref().unwrap_or_default())
            .build()
        {
            query = query.filter(condition);
        }
        if let Some(from) = filter.from {
            query = query.filter(planning_event::Column::StartAt.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(planning_event::Column::StartAt.lte(to));
        }
        if let Some(client_id) = filter.client_id {
            query = query.filter(planning_event::Column::ClientId.eq(client_id));
        }

        Ok(query
            .order_by_asc(planning_event::Column::StartAt)
            .order_by_asc(planning_event::Column::Id)
            .all(&*self.db)
            .await?)
    }

    /// Events of one client starting at or after `now`
    #[instrument(skip(self))]
    pub async fn upcoming_for_client(
        &self,
        client_id: i32,
        now: DateTime<Utc>,
    ) -> Result<Vec<PlanningEventModel>, ServiceError> {
        self.list(PlanningQuery {
            client_id: Some(client_id),
            from: Some(now),
            ..Default::default()
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<PlanningEventModel, ServiceError> {
        find_or_not_found::<PlanningEvent, _>(&*self.db, id, "Planning event").await
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i32,
        input: PlanningInput,
    ) -> Result<PlanningEventModel, ServiceError> {
        input.check()?;

        let existing = self.get(id).await?;
        find_or_not_found::<Client, _>(&*self.db, input.client_id, "Client").await?;

        let mut model: planning_event::ActiveModel = existing.into();
        apply_input(&mut model, input);
        let updated = model.update(&*self.db).await?;

        info!(event_id = id, "Planning event updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.get(id).await?.delete(&*self.db).await?;
        info!(event_id = id, "Planning event deleted");
        Ok(())
    }
}

fn apply_input(model: &mut planning_event::ActiveModel, input: PlanningInput) {
    model.client_id = Set(input.client_id);
    model.start_at = Set(input.start_at);
    model.end_at = Set(input.end_at);
    model.work_description = Set(normalize_string(input.work_description));
    model.technician_name = Set(normalize_string(input.technician_name));
    model.car_registration = Set(normalize_string(input.car_registration));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn input() -> PlanningInput {
        PlanningInput {
            client_id: 1,
            start_at: Utc.with_ymd_and_hms(2024, 5, 6, 8, 30, 0).unwrap(),
            end_at: None,
            work_description: "Vidange".into(),
            technician_name: "Marc".into(),
            car_registration: "AB-123-CD".into(),
        }
    }

    #[test]
    fn end_before_start_is_rejected() {
        let mut event = input();
        event.end_at = Some(event.start_at - Duration::minutes(1));
        assert!(matches!(
            event.check(),
            Err(ServiceError::ValidationError(_))
        ));
    }

    #[test]
    fn open_ended_and_zero_length_events_are_accepted() {
        let mut event = input();
        assert!(event.check().is_ok());
        event.end_at = Some(event.start_at);
        assert!(event.check().is_ok());
    }

    #[test]
    fn blank_registration_is_rejected() {
        let mut event = input();
        event.car_registration = "  ".into();
        assert!(event.check().is_err());
    }
}

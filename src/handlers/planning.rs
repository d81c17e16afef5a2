use super::common::{created_response, no_content_response, ApiJson, ApiQuery, IdPath};
use crate::{
    entities::PlanningEventModel,
    errors::ServiceError,
    services::planning::{PlanningInput, PlanningQuery},
    ApiResponse, ApiResult, AppState,
};
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

#[utoipa::path(
    post,
    path = "/api/planning",
    tag = "Planning",
    request_body = PlanningInput,
    responses(
        (status = 201, description = "Event scheduled", body = ApiResponse<PlanningEventModel>),
        (status = 400, description = "Invalid event or end before start", body = crate::errors::ErrorResponse),
        (status = 404, description = "Client not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn create_event(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<PlanningInput>,
) -> Result<(StatusCode, Json<ApiResponse<PlanningEventModel>>), ServiceError> {
    let event = state.services.planning.create(input).await?;
    Ok(created_response(event))
}

/// Calendar view, ordered by start time
#[utoipa::path(
    get,
    path = "/api/planning",
    tag = "Planning",
    params(PlanningQuery),
    responses(
        (status = 200, description = "Events ordered by start", body = ApiResponse<Vec<PlanningEventModel>>),
        (status = 400, description = "`from` later than `to`", body = crate::errors::ErrorResponse),
    )
)]
pub async fn list_events(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PlanningQuery>,
) -> ApiResult<Vec<PlanningEventModel>> {
    let events = state.services.planning.list(query).await?;
    Ok(Json(ApiResponse::success(events)))
}

#[utoipa::path(
    get,
    path = "/api/planning/{id}",
    tag = "Planning",
    params(("id" = i32, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event", body = ApiResponse<PlanningEventModel>),
        (status = 404, description = "Event not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<PlanningEventModel> {
    let event = state.services.planning.get(id).await?;
    Ok(Json(ApiResponse::success(event)))
}

#[utoipa::path(
    put,
    path = "/api/planning/{id}",
    tag = "Planning",
    params(("id" = i32, Path, description = "Event id")),
    request_body = PlanningInput,
    responses(
        (status = 200, description = "Event updated", body = ApiResponse<PlanningEventModel>),
        (status = 404, description = "Event or client not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn update_event(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ApiJson(input): ApiJson<PlanningInput>,
) -> ApiResult<PlanningEventModel> {
    let event = state.services.planning.update(id, input).await?;
    Ok(Json(ApiResponse::success(event)))
}

#[utoipa::path(
    delete,
    path = "/api/planning/{id}",
    tag = "Planning",
    params(("id" = i32, Path, description = "Event id")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 404, description = "Event not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn delete_event(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<StatusCode, ServiceError> {
    state.services.planning.delete(id).await?;
    Ok(no_content_response())
}

pub fn planning_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_events).post(create_event))
        .route(
            "/:id",
            get(get_event).put(update_event).delete(delete_event),
        )
}

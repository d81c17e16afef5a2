use super::common::{created_response, no_content_response, ApiJson, ApiQuery, IdPath, ListQuery};
use crate::{
    entities::TechnicianModel, errors::ServiceError, services::technicians::TechnicianInput,
    ApiResponse, ApiResult, AppState,
};
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

#[utoipa::path(
    post,
    path = "/api/techniciens",
    tag = "Technicians",
    request_body = TechnicianInput,
    responses(
        (status = 201, description = "Technician created", body = ApiResponse<TechnicianModel>),
        (status = 400, description = "Missing or invalid field", body = crate::errors::ErrorResponse),
        (status = 409, description = "Technician number already used", body = crate::errors::ErrorResponse),
    )
)]
pub async fn create_technician(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<TechnicianInput>,
) -> Result<(StatusCode, Json<ApiResponse<TechnicianModel>>), ServiceError> {
    let technician = state.services.technicians.create(input).await?;
    Ok(created_response(technician))
}

#[utoipa::path(
    get,
    path = "/api/techniciens",
    tag = "Technicians",
    params(ListQuery),
    responses((status = 200, description = "Technicians ordered by id", body = ApiResponse<Vec<TechnicianModel>>))
)]
pub async fn list_technicians(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Vec<TechnicianModel>> {
    let technicians = state.services.technicians.list(query.q()).await?;
    Ok(Json(ApiResponse::success(technicians)))
}

#[utoipa::path(
    get,
    path = "/api/techniciens/{id}",
    tag = "Technicians",
    params(("id" = i32, Path, description = "Technician id")),
    responses(
        (status = 200, description = "Technician", body = ApiResponse<TechnicianModel>),
        (status = 404, description = "Technician not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_technician(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<TechnicianModel> {
    let technician = state.services.technicians.get(id).await?;
    Ok(Json(ApiResponse::success(technician)))
}

#[utoipa::path(
    put,
    path = "/api/techniciens/{id}",
    tag = "Technicians",
    params(("id" = i32, Path, description = "Technician id")),
    request_body = TechnicianInput,
    responses(
        (status = 200, description = "Technician updated", body = ApiResponse<TechnicianModel>),
        (status = 404, description = "Technician not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Technician number already used", body = crate::errors::ErrorResponse),
    )
)]
pub async fn update_technician(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ApiJson(input): ApiJson<TechnicianInput>,
) -> ApiResult<TechnicianModel> {
    let technician = state.services.technicians.update(id, input).await?;
    Ok(Json(ApiResponse::success(technician)))
}

#[utoipa::path(
    delete,
    path = "/api/techniciens/{id}",
    tag = "Technicians",
    params(("id" = i32, Path, description = "Technician id")),
    responses(
        (status = 204, description = "Technician deleted"),
        (status = 404, description = "Technician not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn delete_technician(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<StatusCode, ServiceError> {
    state.services.technicians.delete(id).await?;
    Ok(no_content_response())
}

pub fn technicians_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_technicians).post(create_technician))
        .route(
            "/:id",
            get(get_technician)
                .put(update_technician)
                .delete(delete_technician),
        )
}

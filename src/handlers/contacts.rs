//! Insurer and expert directories.

use super::common::{created_response, no_content_response, ApiJson, ApiQuery, IdPath, ListQuery};
use crate::{
    entities::{ExpertModel, InsurerModel},
    errors::ServiceError,
    services::contacts::{ExpertInput, InsurerInput},
    ApiResponse, ApiResult, AppState,
};
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

#[utoipa::path(
    post,
    path = "/api/assureurs",
    tag = "Insurers",
    request_body = InsurerInput,
    responses(
        (status = 201, description = "Insurer created", body = ApiResponse<InsurerModel>),
        (status = 400, description = "Invalid insurer", body = crate::errors::ErrorResponse),
    )
)]
pub async fn create_insurer(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<InsurerInput>,
) -> Result<(StatusCode, Json<ApiResponse<InsurerModel>>), ServiceError> {
    let insurer = state.services.insurers.create(input).await?;
    Ok(created_response(insurer))
}

#[utoipa::path(
    get,
    path = "/api/assureurs",
    tag = "Insurers",
    params(ListQuery),
    responses((status = 200, description = "Insurers ordered by id", body = ApiResponse<Vec<InsurerModel>>))
)]
pub async fn list_insurers(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Vec<InsurerModel>> {
    let insurers = state.services.insurers.list(query.q()).await?;
    Ok(Json(ApiResponse::success(insurers)))
}

#[utoipa::path(
    get,
    path = "/api/assureurs/{id}",
    tag = "Insurers",
    params(("id" = i32, Path, description = "Insurer id")),
    responses(
        (status = 200, description = "Insurer", body = ApiResponse<InsurerModel>),
        (status = 404, description = "Insurer not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_insurer(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<InsurerModel> {
    let insurer = state.services.insurers.get(id).await?;
    Ok(Json(ApiResponse::success(insurer)))
}

#[utoipa::path(
    put,
    path = "/api/assureurs/{id}",
    tag = "Insurers",
    params(("id" = i32, Path, description = "Insurer id")),
    request_body = InsurerInput,
    responses(
        (status = 200, description = "Insurer updated", body = ApiResponse<InsurerModel>),
        (status = 404, description = "Insurer not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn update_insurer(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ApiJson(input): ApiJson<InsurerInput>,
) -> ApiResult<InsurerModel> {
    let insurer = state.services.insurers.update(id, input).await?;
    Ok(Json(ApiResponse::success(insurer)))
}

#[utoipa::path(
    delete,
    path = "/api/assureurs/{id}",
    tag = "Insurers",
    params(("id" = i32, Path, description = "Insurer id")),
    responses(
        (status = 204, description = "Insurer deleted"),
        (status = 404, description = "Insurer not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn delete_insurer(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<StatusCode, ServiceError> {
    state.services.insurers.delete(id).await?;
    Ok(no_content_response())
}

#[utoipa::path(
    post,
    path = "/api/experts",
    tag = "Experts",
    request_body = ExpertInput,
    responses(
        (status = 201, description = "Expert created", body = ApiResponse<ExpertModel>),
        (status = 400, description = "Invalid expert", body = crate::errors::ErrorResponse),
    )
)]
pub async fn create_expert(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ExpertInput>,
) -> Result<(StatusCode, Json<ApiResponse<ExpertModel>>), ServiceError> {
    let expert = state.services.experts.create(input).await?;
    Ok(created_response(expert))
}

#[utoipa::path(
    get,
    path = "/api/experts",
    tag = "Experts",
    params(ListQuery),
    responses((status = 200, description = "Experts ordered by id", body = ApiResponse<Vec<ExpertModel>>))
)]
pub async fn list_experts(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Vec<ExpertModel>> {
    let experts = state.services.experts.list(query.q()).await?;
    Ok(Json(ApiResponse::success(experts)))
}

#[utoipa::path(
    get,
    path = "/api/experts/{id}",
    tag = "Experts",
    params(("id" = i32, Path, description = "Expert id")),
    responses(
        (status = 200, description = "Expert", body = ApiResponse<ExpertModel>),
        (status = 404, description = "Expert not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_expert(State(state): State<AppState>, IdPath(id): IdPath) -> ApiResult<ExpertModel> {
    let expert = state.services.experts.get(id).await?;
    Ok(Json(ApiResponse::success(expert)))
}

#[utoipa::path(
    put,
    path = "/api/experts/{id}",
    tag = "Experts",
    params(("id" = i32, Path, description = "Expert id")),
    request_body = ExpertInput,
    responses(
        (status = 200, description = "Expert updated", body = ApiResponse<ExpertModel>),
        (status = 404, description = "Expert not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn update_expert(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ApiJson(input): ApiJson<ExpertInput>,
) -> ApiResult<ExpertModel> {
    let expert = state.services.experts.update(id, input).await?;
    Ok(Json(ApiResponse::success(expert)))
}

#[utoipa::path(
    delete,
    path = "/api/experts/{id}",
    tag = "Experts",
    params(("id" = i32, Path, description = "Expert id")),
    responses(
        (status = 204, description = "Expert deleted"),
        (status = 404, description = "Expert not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn delete_expert(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<StatusCode, ServiceError> {
    state.services.experts.delete(id).await?;
    Ok(no_content_response())
}

pub fn insurers_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_insurers).post(create_insurer))
        .route(
            "/:id",
            get(get_insurer).put(update_insurer).delete(delete_insurer),
        )
}

pub fn experts_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_experts).post(create_expert))
        .route(
            "/:id",
            get(get_expert).put(update_expert).delete(delete_expert),
        )
}

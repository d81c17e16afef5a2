use super::common::{created_response, no_content_response, ApiJson, ApiQuery, IdPath, ListQuery};
use crate::{
    entities::PartModel,
    errors::ServiceError,
    services::parts::{PartInput, PartSearch},
    ApiResponse, ApiResult, AppState,
};
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

#[utoipa::path(
    post,
    path = "/api/pieces",
    tag = "Parts",
    request_body = PartInput,
    responses(
        (status = 201, description = "Part created", body = ApiResponse<PartModel>),
        (status = 400, description = "Invalid part", body = crate::errors::ErrorResponse),
        (status = 404, description = "Supplier not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn create_part(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<PartInput>,
) -> Result<(StatusCode, Json<ApiResponse<PartModel>>), ServiceError> {
    let part = state.services.parts.create(input).await?;
    Ok(created_response(part))
}

#[utoipa::path(
    get,
    path = "/api/pieces",
    tag = "Parts",
    params(ListQuery),
    responses((status = 200, description = "Parts ordered by id", body = ApiResponse<Vec<PartModel>>))
)]
pub async fn list_parts(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Vec<PartModel>> {
    let parts = state.services.parts.list(query.q()).await?;
    Ok(Json(ApiResponse::success(parts)))
}

#[utoipa::path(
    get,
    path = "/api/pieces/search",
    tag = "Parts",
    params(PartSearch),
    responses((status = 200, description = "Parts matching every criterion", body = ApiResponse<Vec<PartModel>>))
)]
pub async fn search_parts(
    State(state): State<AppState>,
    ApiQuery(criteria): ApiQuery<PartSearch>,
) -> ApiResult<Vec<PartModel>> {
    let parts = state.services.parts.search(criteria).await?;
    Ok(Json(ApiResponse::success(parts)))
}

#[utoipa::path(
    get,
    path = "/api/pieces/{id}",
    tag = "Parts",
    params(("id" = i32, Path, description = "Part id")),
    responses(
        (status = 200, description = "Part", body = ApiResponse<PartModel>),
        (status = 404, description = "Part not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_part(State(state): State<AppState>, IdPath(id): IdPath) -> ApiResult<PartModel> {
    let part = state.services.parts.get(id).await?;
    Ok(Json(ApiResponse::success(part)))
}

#[utoipa::path(
    put,
    path = "/api/pieces/{id}",
    tag = "Parts",
    params(("id" = i32, Path, description = "Part id")),
    request_body = PartInput,
    responses(
        (status = 200, description = "Part updated", body = ApiResponse<PartModel>),
        (status = 404, description = "Part or supplier not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn update_part(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ApiJson(input): ApiJson<PartInput>,
) -> ApiResult<PartModel> {
    let part = state.services.parts.update(id, input).await?;
    Ok(Json(ApiResponse::success(part)))
}

#[utoipa::path(
    delete,
    path = "/api/pieces/{id}",
    tag = "Parts",
    params(("id" = i32, Path, description = "Part id")),
    responses(
        (status = 204, description = "Part deleted"),
        (status = 404, description = "Part not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Part billed on an invoice", body = crate::errors::ErrorResponse),
    )
)]
pub async fn delete_part(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<StatusCode, ServiceError> {
    state.services.parts.delete(id).await?;
    Ok(no_content_response())
}

pub fn parts_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_parts).post(create_part))
        .route("/search", get(search_parts))
        .route("/:id", get(get_part).put(update_part).delete(delete_part))
}

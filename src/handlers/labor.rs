use super::common::{created_response, no_content_response, ApiJson, ApiQuery, IdPath, ListQuery};
use crate::{
    entities::LaborRateModel, errors::ServiceError, services::labor::LaborRateInput, ApiResponse,
    ApiResult, AppState,
};
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

#[utoipa::path(
    post,
    path = "/api/maindoeuvre",
    tag = "Labor",
    request_body = LaborRateInput,
    responses(
        (status = 201, description = "Labor rate created", body = ApiResponse<LaborRateModel>),
        (status = 400, description = "Invalid labor rate", body = crate::errors::ErrorResponse),
    )
)]
pub async fn create_labor_rate(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<LaborRateInput>,
) -> Result<(StatusCode, Json<ApiResponse<LaborRateModel>>), ServiceError> {
    let rate = state.services.labor.create(input).await?;
    Ok(created_response(rate))
}

#[utoipa::path(
    get,
    path = "/api/maindoeuvre",
    tag = "Labor",
    params(ListQuery),
    responses((status = 200, description = "Labor rates ordered by id", body = ApiResponse<Vec<LaborRateModel>>))
)]
pub async fn list_labor_rates(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Vec<LaborRateModel>> {
    let rates = state.services.labor.list(query.q()).await?;
    Ok(Json(ApiResponse::success(rates)))
}

#[utoipa::path(
    get,
    path = "/api/maindoeuvre/{id}",
    tag = "Labor",
    params(("id" = i32, Path, description = "Labor rate id")),
    responses(
        (status = 200, description = "Labor rate", body = ApiResponse<LaborRateModel>),
        (status = 404, description = "Labor rate not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_labor_rate(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<LaborRateModel> {
    let rate = state.services.labor.get(id).await?;
    Ok(Json(ApiResponse::success(rate)))
}

#[utoipa::path(
    put,
    path = "/api/maindoeuvre/{id}",
    tag = "Labor",
    params(("id" = i32, Path, description = "Labor rate id")),
    request_body = LaborRateInput,
    responses(
        (status = 200, description = "Labor rate updated", body = ApiResponse<LaborRateModel>),
        (status = 404, description = "Labor rate not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn update_labor_rate(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ApiJson(input): ApiJson<LaborRateInput>,
) -> ApiResult<LaborRateModel> {
    let rate = state.services.labor.update(id, input).await?;
    Ok(Json(ApiResponse::success(rate)))
}

#[utoipa::path(
    delete,
    path = "/api/maindoeuvre/{id}",
    tag = "Labor",
    params(("id" = i32, Path, description = "Labor rate id")),
    responses(
        (status = 204, description = "Labor rate deleted"),
        (status = 404, description = "Labor rate not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Labor rate billed on an invoice", body = crate::errors::ErrorResponse),
    )
)]
pub async fn delete_labor_rate(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<StatusCode, ServiceError> {
    state.services.labor.delete(id).await?;
    Ok(no_content_response())
}

pub fn labor_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_labor_rates).post(create_labor_rate))
        .route(
            "/:id",
            get(get_labor_rate)
                .put(update_labor_rate)
                .delete(delete_labor_rate),
        )
}

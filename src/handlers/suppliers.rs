use super::common::{created_response, no_content_response, ApiJson, ApiQuery, IdPath, ListQuery};
use crate::{
    entities::{SupplierDiscountModel, SupplierModel},
    errors::ServiceError,
    services::suppliers::{DiscountInput, SupplierInput},
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};

#[utoipa::path(
    post,
    path = "/api/fournisseurs",
    tag = "Suppliers",
    request_body = SupplierInput,
    responses(
        (status = 201, description = "Supplier created", body = ApiResponse<SupplierModel>),
        (status = 400, description = "Invalid supplier", body = crate::errors::ErrorResponse),
        (status = 409, description = "Supplier name already used", body = crate::errors::ErrorResponse),
    )
)]
pub async fn create_supplier(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<SupplierInput>,
) -> Result<(StatusCode, Json<ApiResponse<SupplierModel>>), ServiceError> {
    let supplier = state.services.suppliers.create(input).await?;
    Ok(created_response(supplier))
}

#[utoipa::path(
    get,
    path = "/api/fournisseurs",
    tag = "Suppliers",
    params(ListQuery),
    responses(
        (status = 200, description = "Suppliers ordered by id", body = ApiResponse<Vec<SupplierModel>>),
    )
)]
pub async fn list_suppliers(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Vec<SupplierModel>> {
    let suppliers = state.services.suppliers.list(query.q()).await?;
    Ok(Json(ApiResponse::success(suppliers)))
}

#[utoipa::path(
    get,
    path = "/api/fournisseurs/{id}",
    tag = "Suppliers",
    params(("id" = i32, Path, description = "Supplier id")),
    responses(
        (status = 200, description = "Supplier", body = ApiResponse<SupplierModel>),
        (status = 404, description = "Supplier not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_supplier(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<SupplierModel> {
    let supplier = state.services.suppliers.get(id).await?;
    Ok(Json(ApiResponse::success(supplier)))
}

#[utoipa::path(
    put,
    path = "/api/fournisseurs/{id}",
    tag = "Suppliers",
    params(("id" = i32, Path, description = "Supplier id")),
    request_body = SupplierInput,
    responses(
        (status = 200, description = "Supplier updated", body = ApiResponse<SupplierModel>),
        (status = 404, description = "Supplier not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Supplier name already used", body = crate::errors::ErrorResponse),
    )
)]
pub async fn update_supplier(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ApiJson(input): ApiJson<SupplierInput>,
) -> ApiResult<SupplierModel> {
    let supplier = state.services.suppliers.update(id, input).await?;
    Ok(Json(ApiResponse::success(supplier)))
}

/// Also removes the supplier's discounts
#[utoipa::path(
    delete,
    path = "/api/fournisseurs/{id}",
    tag = "Suppliers",
    params(("id" = i32, Path, description = "Supplier id")),
    responses(
        (status = 204, description = "Supplier deleted"),
        (status = 404, description = "Supplier not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Supplier still has parts", body = crate::errors::ErrorResponse),
    )
)]
pub async fn delete_supplier(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<StatusCode, ServiceError> {
    state.services.suppliers.delete(id).await?;
    Ok(no_content_response())
}

#[utoipa::path(
    get,
    path = "/api/fournisseurs/{id}/remises",
    tag = "Suppliers",
    params(("id" = i32, Path, description = "Supplier id")),
    responses(
        (status = 200, description = "Discounts of the supplier", body = ApiResponse<Vec<SupplierDiscountModel>>),
        (status = 404, description = "Supplier not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn list_discounts(
    State(state): State<AppState>,
    IdPath(supplier_id): IdPath,
) -> ApiResult<Vec<SupplierDiscountModel>> {
    let discounts = state.services.suppliers.list_discounts(supplier_id).await?;
    Ok(Json(ApiResponse::success(discounts)))
}

#[utoipa::path(
    post,
    path = "/api/fournisseurs/{id}/remises",
    tag = "Suppliers",
    params(("id" = i32, Path, description = "Supplier id")),
    request_body = DiscountInput,
    responses(
        (status = 201, description = "Discount created", body = ApiResponse<SupplierDiscountModel>),
        (status = 400, description = "Percentage outside 0..=100", body = crate::errors::ErrorResponse),
        (status = 404, description = "Supplier not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn create_discount(
    State(state): State<AppState>,
    IdPath(supplier_id): IdPath,
    ApiJson(input): ApiJson<DiscountInput>,
) -> Result<(StatusCode, Json<ApiResponse<SupplierDiscountModel>>), ServiceError> {
    let discount = state
        .services
        .suppliers
        .create_discount(supplier_id, input)
        .await?;
    Ok(created_response(discount))
}

#[utoipa::path(
    put,
    path = "/api/remises_fournisseur/{id}",
    tag = "Suppliers",
    params(("id" = i32, Path, description = "Discount id")),
    request_body = DiscountInput,
    responses(
        (status = 200, description = "Discount updated", body = ApiResponse<SupplierDiscountModel>),
        (status = 404, description = "Discount not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn update_discount(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ApiJson(input): ApiJson<DiscountInput>,
) -> ApiResult<SupplierDiscountModel> {
    let discount = state.services.suppliers.update_discount(id, input).await?;
    Ok(Json(ApiResponse::success(discount)))
}

#[utoipa::path(
    delete,
    path = "/api/remises_fournisseur/{id}",
    tag = "Suppliers",
    params(("id" = i32, Path, description = "Discount id")),
    responses(
        (status = 204, description = "Discount deleted"),
        (status = 404, description = "Discount not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn delete_discount(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<StatusCode, ServiceError> {
    state.services.suppliers.delete_discount(id).await?;
    Ok(no_content_response())
}

pub fn suppliers_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_suppliers).post(create_supplier))
        .route(
            "/:id",
            get(get_supplier).put(update_supplier).delete(delete_supplier),
        )
        .route("/:id/remises", get(list_discounts).post(create_discount))
}

pub fn discounts_routes() -> Router<AppState> {
    Router::new().route("/:id", put(update_discount).delete(delete_discount))
}

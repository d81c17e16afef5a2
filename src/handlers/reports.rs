//! Accounting endpoints under `/api/comptabilite`.

use super::common::{ApiJson, ApiQuery};
use crate::{
    services::reports::{
        CategoryRevenue, MonthQuery, MonthRevenue, MonthlyRevenue, RevenueTargetInput,
        RevenueTargetView, SupplierExpense, TargetQuery, YearQuery,
    },
    ApiResponse, ApiResult, AppState,
};
use axum::{extract::State, routing::get, Json, Router};
use chrono::{Datelike, Utc};

#[utoipa::path(
    get,
    path = "/api/comptabilite/ca-mensuel",
    tag = "Accounting",
    params(MonthQuery),
    responses(
        (status = 200, description = "Revenue of the month", body = ApiResponse<MonthlyRevenue>),
        (status = 400, description = "Invalid month", body = crate::errors::ErrorResponse),
    )
)]
pub async fn monthly_revenue(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<MonthQuery>,
) -> ApiResult<MonthlyRevenue> {
    let today = Utc::now().date_naive();
    let revenue = state
        .services
        .reports
        .monthly_revenue(
            query.year.unwrap_or(today.year()),
            query.month.unwrap_or(today.month()),
        )
        .await?;
    Ok(Json(ApiResponse::success(revenue)))
}

#[utoipa::path(
    get,
    path = "/api/comptabilite/ca-par-mois",
    tag = "Accounting",
    params(YearQuery),
    responses((status = 200, description = "Twelve monthly totals", body = ApiResponse<Vec<MonthRevenue>>))
)]
pub async fn revenue_by_month(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<YearQuery>,
) -> ApiResult<Vec<MonthRevenue>> {
    let year = query.year.unwrap_or_else(|| Utc::now().year());
    let months = state.services.reports.revenue_by_month(year).await?;
    Ok(Json(ApiResponse::success(months)))
}

#[utoipa::path(
    get,
    path = "/api/comptabilite/depenses-par-fournisseur",
    tag = "Accounting",
    responses((status = 200, description = "Billed parts per supplier", body = ApiResponse<Vec<SupplierExpense>>))
)]
pub async fn expenses_by_supplier(State(state): State<AppState>) -> ApiResult<Vec<SupplierExpense>> {
    let expenses = state.services.reports.expenses_by_supplier().await?;
    Ok(Json(ApiResponse::success(expenses)))
}

#[utoipa::path(
    get,
    path = "/api/comptabilite/ca-par-categorie",
    tag = "Accounting",
    responses((status = 200, description = "Billed parts per category", body = ApiResponse<Vec<CategoryRevenue>>))
)]
pub async fn revenue_by_category(
    State(state): State<AppState>,
) -> ApiResult<Vec<CategoryRevenue>> {
    let categories = state.services.reports.revenue_by_category().await?;
    Ok(Json(ApiResponse::success(categories)))
}

#[utoipa::path(
    get,
    path = "/api/comptabilite/objectif-ca",
    tag = "Accounting",
    params(TargetQuery),
    responses((status = 200, description = "Target for the date, amount null when unset", body = ApiResponse<RevenueTargetView>))
)]
pub async fn get_revenue_target(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TargetQuery>,
) -> ApiResult<RevenueTargetView> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let target = state.services.reports.revenue_target(date).await?;
    Ok(Json(ApiResponse::success(target)))
}

#[utoipa::path(
    put,
    path = "/api/comptabilite/objectif-ca",
    tag = "Accounting",
    request_body = RevenueTargetInput,
    responses(
        (status = 200, description = "Target saved", body = ApiResponse<RevenueTargetView>),
        (status = 400, description = "Negative amount", body = crate::errors::ErrorResponse),
    )
)]
pub async fn set_revenue_target(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<RevenueTargetInput>,
) -> ApiResult<RevenueTargetView> {
    let target = state.services.reports.set_revenue_target(input).await?;
    Ok(Json(ApiResponse::success(target)))
}

pub fn reports_routes() -> Router<AppState> {
    Router::new()
        .route("/ca-mensuel", get(monthly_revenue))
        .route("/ca-par-mois", get(revenue_by_month))
        .route("/depenses-par-fournisseur", get(expenses_by_supplier))
        .route("/ca-par-categorie", get(revenue_by_category))
        .route(
            "/objectif-ca",
            get(get_revenue_target).put(set_revenue_target),
        )
}

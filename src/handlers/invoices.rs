use super::common::{created_response, no_content_response, ApiJson, ApiQuery, IdPath, ListQuery};
use crate::{
    entities::InvoiceModel,
    errors::ServiceError,
    pdf,
    services::invoices::{InvoiceInput, InvoiceWithLines},
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tracing::info;

/// Totals are computed from the lines; any totals in the body are ignored
#[utoipa::path(
    post,
    path = "/api/factures",
    tag = "Invoices",
    request_body = InvoiceInput,
    responses(
        (status = 201, description = "Invoice created with its lines", body = ApiResponse<InvoiceWithLines>),
        (status = 400, description = "No lines, or an invalid line", body = crate::errors::ErrorResponse),
        (status = 404, description = "Client, part or labor rate not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Invoice number already used", body = crate::errors::ErrorResponse),
    )
)]
pub async fn create_invoice(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<InvoiceInput>,
) -> Result<(StatusCode, Json<ApiResponse<InvoiceWithLines>>), ServiceError> {
    let invoice = state.services.invoices.create(input).await?;
    Ok(created_response(invoice))
}

#[utoipa::path(
    get,
    path = "/api/factures",
    tag = "Invoices",
    params(ListQuery),
    responses((status = 200, description = "Invoices ordered by id", body = ApiResponse<Vec<InvoiceModel>>))
)]
pub async fn list_invoices(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Vec<InvoiceModel>> {
    let invoices = state.services.invoices.list(query.q()).await?;
    Ok(Json(ApiResponse::success(invoices)))
}

/// Search by invoice number or client last name
#[utoipa::path(
    get,
    path = "/api/factures/search",
    tag = "Invoices",
    params(ListQuery),
    responses((status = 200, description = "Matching invoices", body = ApiResponse<Vec<InvoiceModel>>))
)]
pub async fn search_invoices(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Vec<InvoiceModel>> {
    let invoices = state.services.invoices.list(query.q()).await?;
    Ok(Json(ApiResponse::success(invoices)))
}

#[utoipa::path(
    get,
    path = "/api/factures/{id}",
    tag = "Invoices",
    params(("id" = i32, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Invoice with its lines", body = ApiResponse<InvoiceWithLines>),
        (status = 404, description = "Invoice not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_invoice(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<InvoiceWithLines> {
    let invoice = state.services.invoices.get(id).await?;
    Ok(Json(ApiResponse::success(invoice)))
}

/// Replaces the header and every line
#[utoipa::path(
    put,
    path = "/api/factures/{id}",
    tag = "Invoices",
    params(("id" = i32, Path, description = "Invoice id")),
    request_body = InvoiceInput,
    responses(
        (status = 200, description = "Invoice updated", body = ApiResponse<InvoiceWithLines>),
        (status = 404, description = "Invoice or a reference not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Invoice number already used", body = crate::errors::ErrorResponse),
    )
)]
pub async fn update_invoice(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ApiJson(input): ApiJson<InvoiceInput>,
) -> ApiResult<InvoiceWithLines> {
    let invoice = state.services.invoices.update(id, input).await?;
    Ok(Json(ApiResponse::success(invoice)))
}

#[utoipa::path(
    delete,
    path = "/api/factures/{id}",
    tag = "Invoices",
    params(("id" = i32, Path, description = "Invoice id")),
    responses(
        (status = 204, description = "Invoice and lines deleted"),
        (status = 404, description = "Invoice not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn delete_invoice(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<StatusCode, ServiceError> {
    state.services.invoices.delete(id).await?;
    Ok(no_content_response())
}

#[utoipa::path(
    get,
    path = "/api/factures/{id}/pdf",
    tag = "Invoices",
    params(("id" = i32, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Invoice as a PDF attachment", content_type = "application/pdf", body = Vec<u8>),
        (status = 404, description = "Invoice not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn invoice_pdf(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Response, ServiceError> {
    let document = state.services.invoices.document(id).await?;
    let bytes = pdf::render_invoice(&state.config.company_name, &document)?;

    let disposition = format!(
        "attachment; filename=\"facture_{}.pdf\"",
        sanitize_filename(&document.invoice.invoice_number)
    );
    let disposition = HeaderValue::from_str(&disposition)
        .map_err(|e| ServiceError::InternalError(format!("invalid Content-Disposition: {}", e)))?;

    info!(invoice_id = id, size = bytes.len(), "Invoice PDF rendered");
    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

/// Keeps the attachment name a plain ASCII token
fn sanitize_filename(number: &str) -> String {
    number
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

pub fn invoices_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_invoices).post(create_invoice))
        .route("/search", get(search_invoices))
        .route(
            "/:id",
            get(get_invoice).put(update_invoice).delete(delete_invoice),
        )
        .route("/:id/pdf", get(invoice_pdf))
}

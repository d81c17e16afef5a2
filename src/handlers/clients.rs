use super::common::{created_response, no_content_response, ApiJson, ApiQuery, IdPath, ListQuery};
use crate::{
    entities::ClientModel,
    errors::ServiceError,
    services::clients::{ClientInput, ClientSearch},
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

#[utoipa::path(
    post,
    path = "/api/clients",
    tag = "Clients",
    request_body = ClientInput,
    responses(
        (status = 201, description = "Client created", body = ApiResponse<ClientModel>),
        (status = 400, description = "Invalid client", body = crate::errors::ErrorResponse),
    )
)]
pub async fn create_client(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ClientInput>,
) -> Result<(StatusCode, Json<ApiResponse<ClientModel>>), ServiceError> {
    let client = state.services.clients.create(input).await?;
    Ok(created_response(client))
}

#[utoipa::path(
    get,
    path = "/api/clients",
    tag = "Clients",
    params(ListQuery),
    responses(
        (status = 200, description = "Clients ordered by id", body = ApiResponse<Vec<ClientModel>>),
    )
)]
pub async fn list_clients(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Vec<ClientModel>> {
    let clients = state.services.clients.list(query.q()).await?;
    Ok(Json(ApiResponse::success(clients)))
}

/// Structured search: names by substring, postal code exactly, all criteria combined
#[utoipa::path(
    post,
    path = "/api/clients/search",
    tag = "Clients",
    request_body = ClientSearch,
    responses(
        (status = 200, description = "Matching clients", body = ApiResponse<Vec<ClientModel>>),
    )
)]
pub async fn search_clients(
    State(state): State<AppState>,
    ApiJson(criteria): ApiJson<ClientSearch>,
) -> ApiResult<Vec<ClientModel>> {
    let clients = state.services.clients.search(criteria).await?;
    Ok(Json(ApiResponse::success(clients)))
}

#[utoipa::path(
    get,
    path = "/api/clients/{id}",
    tag = "Clients",
    params(("id" = i32, Path, description = "Client id")),
    responses(
        (status = 200, description = "Client", body = ApiResponse<ClientModel>),
        (status = 404, description = "Client not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_client(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<ClientModel> {
    let client = state.services.clients.get(id).await?;
    Ok(Json(ApiResponse::success(client)))
}

#[utoipa::path(
    put,
    path = "/api/clients/{id}",
    tag = "Clients",
    params(("id" = i32, Path, description = "Client id")),
    request_body = ClientInput,
    responses(
        (status = 200, description = "Client updated", body = ApiResponse<ClientModel>),
        (status = 404, description = "Client not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn update_client(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ApiJson(input): ApiJson<ClientInput>,
) -> ApiResult<ClientModel> {
    let client = state.services.clients.update(id, input).await?;
    Ok(Json(ApiResponse::success(client)))
}

#[utoipa::path(
    delete,
    path = "/api/clients/{id}",
    tag = "Clients",
    params(("id" = i32, Path, description = "Client id")),
    responses(
        (status = 204, description = "Client deleted"),
        (status = 404, description = "Client not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Client has invoices or planning events", body = crate::errors::ErrorResponse),
    )
)]
pub async fn delete_client(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<StatusCode, ServiceError> {
    state.services.clients.delete(id).await?;
    Ok(no_content_response())
}

pub fn clients_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_clients).post(create_client))
        .route("/search", post(search_clients))
        .route(
            "/:id",
            get(get_client).put(update_client).delete(delete_client),
        )
}

use super::common::ApiJson;
use crate::{
    services::advisor::{AdviceRequest, AdviceResponse},
    ApiResponse, ApiResult, AppState,
};
use axum::{extract::State, routing::post, Json, Router};

#[utoipa::path(
    post,
    path = "/api/ia/conseil",
    tag = "AI",
    request_body = AdviceRequest,
    responses(
        (status = 200, description = "Advice from the assistant", body = ApiResponse<AdviceResponse>),
        (status = 404, description = "Client not found", body = crate::errors::ErrorResponse),
        (status = 502, description = "AI provider failed", body = crate::errors::ErrorResponse),
        (status = 503, description = "AI assistant not configured", body = crate::errors::ErrorResponse),
    )
)]
pub async fn ask_advice(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AdviceRequest>,
) -> ApiResult<AdviceResponse> {
    let advice = state.services.advisor.advise(request).await?;
    Ok(Json(ApiResponse::success(advice)))
}

pub fn advisor_routes() -> Router<AppState> {
    Router::new().route("/conseil", post(ask_advice))
}

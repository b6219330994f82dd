use axum::{
    Json, Router,
    extract::{Path, State},
    http::HeaderMap,
    routing::{get, post},
};

use crate::{
    dto::payments::{CreateIntentRequest, CreateIntentResponse, IntentStatusResponse, WebhookAck},
    error::{AppError, AppResult},
    response::ApiResponse,
    services::payment_service,
    state::AppState,
};

pub const SIGNATURE_HEADER: &str = "stripe-signature";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create-intent", post(create_intent))
        .route("/intent/{id}", get(intent_status))
        .route("/webhook", post(webhook))
}

#[utoipa::path(
    post,
    path = "/api/payments/create-intent",
    request_body = CreateIntentRequest,
    responses(
        (status = 200, description = "Payment intent created", body = ApiResponse<CreateIntentResponse>),
        (status = 400, description = "Order already paid or not payable"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Payment provider not configured"),
        (status = 502, description = "Payment provider error")
    ),
    tag = "Payments"
)]
pub async fn create_intent(
    State(state): State<AppState>,
    Json(payload): Json<CreateIntentRequest>,
) -> AppResult<Json<ApiResponse<CreateIntentResponse>>> {
    let resp = payment_service::create_intent(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/payments/intent/{id}",
    params(("id" = String, Path, description = "Payment intent ID")),
    responses(
        (status = 200, description = "Payment intent status", body = ApiResponse<IntentStatusResponse>),
        (status = 502, description = "Payment provider error")
    ),
    tag = "Payments"
)]
pub async fn intent_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<IntentStatusResponse>>> {
    let resp = payment_service::intent_status(&state, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/payments/webhook",
    request_body(content = String, description = "Raw event payload", content_type = "application/json"),
    responses(
        (status = 200, description = "Event acknowledged", body = ApiResponse<WebhookAck>),
        (status = 400, description = "Missing or invalid signature")
    ),
    tag = "Payments"
)]
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> AppResult<Json<ApiResponse<WebhookAck>>> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("Missing Stripe-Signature header".into()))?;
    let resp = payment_service::handle_webhook(&state, &body, signature).await?;
    Ok(Json(resp))
}

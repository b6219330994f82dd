use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
    audit,
    dto::payments::{CreateIntentRequest, CreateIntentResponse, IntentStatusResponse, WebhookAck},
    entity::orders::{self, Entity as Orders},
    error::{AppError, AppResult},
    payments::{PaymentError, StripeClient, WebhookEvent},
    pricing,
    response::{ApiResponse, Meta},
    state::AppState,
};

fn client(state: &AppState) -> AppResult<&StripeClient> {
    state
        .payments
        .as_ref()
        .ok_or(AppError::Payment(PaymentError::NotConfigured))
}

fn with_metadata(current: &Value, key: &str, value: Value) -> Value {
    let mut map = current.as_object().cloned().unwrap_or_default();
    map.insert(key.to_string(), value);
    Value::Object(map)
}

pub async fn create_intent(
    state: &AppState,
    payload: CreateIntentRequest,
) -> AppResult<ApiResponse<CreateIntentResponse>> {
    let stripe = client(state)?;
    let order = Orders::find_by_id(payload.order_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    if order.payment_status == "paid" {
        return Err(AppError::BadRequest("Order already paid".into()));
    }
    if order.status == "cancelled" {
        return Err(AppError::BadRequest("Order is cancelled".into()));
    }

    let amount = pricing::to_minor_units(order.total_amount)
        .filter(|a| *a > 0)
        .ok_or_else(|| AppError::BadRequest("Order total is not payable".into()))?;

    let intent = stripe
        .create_payment_intent(
            amount,
            &[
                ("order_id", order.id.to_string()),
                ("store_id", order.store_id.to_string()),
            ],
        )
        .await?;

    tracing::info!(order_id = %order.id, payment_intent = %intent.id, amount, "payment intent created");

    let metadata = with_metadata(&order.metadata, "payment_intent_id", json!(intent.id));
    let order_id = order.id;
    let mut active: orders::ActiveModel = order.into();
    active.payment_status = Set("requires_payment".into());
    active.metadata = Set(metadata);
    active.updated_at = Set(Utc::now().into());
    active.update(&state.orm).await?;

    audit::record(
        &state.orm,
        None,
        "payment_intent_create",
        "orders",
        json!({ "order_id": order_id, "payment_intent_id": intent.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Payment intent created",
        CreateIntentResponse {
            payment_intent_id: intent.id,
            client_secret: intent.client_secret,
            amount: intent.amount,
            currency: intent.currency,
            status: intent.status,
        },
        Some(Meta::empty()),
    ))
}

pub async fn intent_status(
    state: &AppState,
    id: &str,
) -> AppResult<ApiResponse<IntentStatusResponse>> {
    let intent = client(state)?.retrieve_payment_intent(id).await?;
    Ok(ApiResponse::success(
        "Payment intent",
        IntentStatusResponse {
            payment_intent_id: intent.id,
            status: intent.status,
            amount: intent.amount,
            currency: intent.currency,
        },
        None,
    ))
}

/// `(status, payment_status)` an order moves to for an event; `None` status keeps the current one.
pub fn order_transition(event_type: &str) -> Option<(Option<&'static str>, &'static str)> {
    match event_type {
        "payment_intent.succeeded" => Some((Some("paid"), "paid")),
        "payment_intent.payment_failed" => Some((None, "failed")),
        "payment_intent.canceled" => Some((None, "cancelled")),
        _ => None,
    }
}

pub async fn handle_webhook(
    state: &AppState,
    payload: &str,
    signature: &str,
) -> AppResult<ApiResponse<WebhookAck>> {
    let event = client(state)?.verify_webhook(payload, signature)?;
    let order_id = apply_event(state, &event).await?;

    Ok(ApiResponse::success(
        "Webhook received",
        WebhookAck {
            received: true,
            event_type: event.event_type,
            order_id,
        },
        None,
    ))
}

async fn apply_event(state: &AppState, event: &WebhookEvent) -> AppResult<Option<Uuid>> {
    let Some((status, payment_status)) = order_transition(&event.event_type) else {
        tracing::debug!(event_type = %event.event_type, "ignoring webhook event");
        return Ok(None);
    };

    let Some(order_id) = event
        .metadata_value("order_id")
        .and_then(|id| Uuid::parse_str(id).ok())
    else {
        tracing::warn!(event_id = %event.id, "webhook event without order id");
        return Ok(None);
    };

    let Some(order) = Orders::find_by_id(order_id).one(&state.orm).await? else {
        tracing::warn!(event_id = %event.id, %order_id, "webhook event for unknown order");
        return Ok(None);
    };

    let mut metadata = order.metadata.clone();
    if let Some(intent_id) = event.object_id() {
        metadata = with_metadata(&metadata, "payment_intent_id", json!(intent_id));
    }

    let mut active: orders::ActiveModel = order.into();
    if let Some(status) = status {
        active.status = Set(status.to_string());
    }
    active.payment_status = Set(payment_status.to_string());
    active.metadata = Set(metadata);
    active.updated_at = Set(Utc::now().into());
    active.update(&state.orm).await?;

    tracing::info!(%order_id, event_type = %event.event_type, payment_status, "order payment updated");
    audit::record(
        &state.orm,
        None,
        "payment_webhook",
        "orders",
        json!({ "order_id": order_id, "event": event.event_type, "event_id": event.id }),
    )
    .await;

    Ok(Some(order_id))
}

use chrono::Utc;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, sea_query::OnConflict};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
    audit,
    dto::api_keys::{ApiKeyList, UpsertApiKeyRequest},
    entity::api_keys::{self, Column as KeyCol, Entity as ApiKeys},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::ApiKey,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Service names are 1-64 chars of `[a-z0-9_-]`, compared lower-cased.
pub fn validate_service(raw: &str) -> AppResult<String> {
    let service = raw.trim().to_lowercase();
    let valid = (1..=64).contains(&service.len())
        && service
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-');
    if !valid {
        return Err(AppError::BadRequest("Invalid service name".into()));
    }
    Ok(service)
}

pub async fn list_keys(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<ApiKeyList>> {
    let items: Vec<ApiKey> = ApiKeys::find()
        .filter(KeyCol::UserId.eq(user.user_id))
        .order_by_asc(KeyCol::Service)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(ApiKey::from)
        .collect();
    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "API keys",
        ApiKeyList { items },
        Some(Meta::new(1, total, total)),
    ))
}

pub async fn upsert_key(
    state: &AppState,
    user: &AuthUser,
    service: &str,
    payload: UpsertApiKeyRequest,
) -> AppResult<ApiResponse<ApiKey>> {
    let service = validate_service(service)?;
    if !matches!(&payload.credentials, Value::Object(map) if !map.is_empty()) {
        return Err(AppError::BadRequest(
            "credentials must be a non-empty JSON object".into(),
        ));
    }

    let now = Utc::now();
    let row = api_keys::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        service: Set(service.clone()),
        credentials: Set(payload.credentials),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };
    ApiKeys::insert(row)
        .on_conflict(
            OnConflict::columns([KeyCol::UserId, KeyCol::Service])
                .update_columns([KeyCol::Credentials, KeyCol::UpdatedAt])
                .to_owned(),
        )
        .exec(&state.orm)
        .await?;

    let saved = ApiKeys::find()
        .filter(KeyCol::UserId.eq(user.user_id))
        .filter(KeyCol::Service.eq(service.as_str()))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("api key vanished after upsert")))?;

    tracing::info!(user_id = %user.user_id, %service, "api key saved");
    audit::record(
        &state.orm,
        Some(user.user_id),
        "api_key_upsert",
        "api_keys",
        json!({ "service": service }),
    )
    .await;

    Ok(ApiResponse::success("API key saved", saved.into(), Some(Meta::empty())))
}

pub async fn delete_key(
    state: &AppState,
    user: &AuthUser,
    service: &str,
) -> AppResult<ApiResponse<Value>> {
    let service = validate_service(service)?;
    let result = ApiKeys::delete_many()
        .filter(KeyCol::UserId.eq(user.user_id))
        .filter(KeyCol::Service.eq(service.as_str()))
        .exec(&state.orm)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.orm,
        Some(user.user_id),
        "api_key_delete",
        "api_keys",
        json!({ "service": service }),
    )
    .await;

    Ok(ApiResponse::ack("API key deleted"))
}

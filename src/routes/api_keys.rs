use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use serde_json::Value;

use crate::{
    dto::api_keys::{ApiKeyList, UpsertApiKeyRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::ApiKey,
    response::ApiResponse,
    services::api_key_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_keys))
        .route("/{service}", put(upsert_key).delete(delete_key))
}

#[utoipa::path(
    get,
    path = "/api/api-keys",
    responses(
        (status = 200, description = "Stored credentials, masked", body = ApiResponse<ApiKeyList>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "ApiKeys"
)]
pub async fn list_keys(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ApiKeyList>>> {
    let resp = api_key_service::list_keys(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/api-keys/{service}",
    params(("service" = String, Path, description = "Service name")),
    request_body = UpsertApiKeyRequest,
    responses(
        (status = 200, description = "Credentials saved", body = ApiResponse<ApiKey>),
        (status = 400, description = "Invalid service name or credentials")
    ),
    security(("bearer_auth" = [])),
    tag = "ApiKeys"
)]
pub async fn upsert_key(
    State(state): State<AppState>,
    user: AuthUser,
    Path(service): Path<String>,
    Json(payload): Json<UpsertApiKeyRequest>,
) -> AppResult<Json<ApiResponse<ApiKey>>> {
    let resp = api_key_service::upsert_key(&state, &user, &service, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/api-keys/{service}",
    params(("service" = String, Path, description = "Service name")),
    responses(
        (status = 200, description = "Credentials removed"),
        (status = 404, description = "No credentials for this service")
    ),
    security(("bearer_auth" = [])),
    tag = "ApiKeys"
)]
pub async fn delete_key(
    State(state): State<AppState>,
    user: AuthUser,
    Path(service): Path<String>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let resp = api_key_service::delete_key(&state, &user, &service).await?;
    Ok(Json(resp))
}

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::stores::{CreateStoreRequest, DeploymentList, InitStoreResponse, StoreList, StoreListQuery, UpdateStoreRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Deployment, Store},
    response::ApiResponse,
    services::{deployment_service, store_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stores", get(list_stores).post(create_store))
        .route("/stores/init", post(init_store))
        .route("/stores/{id}", get(get_store).put(update_store))
        .route("/stores/{id}/publish", post(publish_store))
        .route("/stores/{id}/unpublish", post(unpublish_store))
        .route("/stores/{id}/deployments", get(list_deployments))
}

#[utoipa::path(
    get,
    path = "/api/stores",
    params(("all" = Option<bool>, Query, description = "Admins only: list every store")),
    responses(
        (status = 200, description = "Stores", body = ApiResponse<StoreList>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "Stores"
)]
pub async fn list_stores(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<StoreListQuery>,
) -> AppResult<Json<ApiResponse<StoreList>>> {
    let resp = store_service::list_stores(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/stores",
    request_body = CreateStoreRequest,
    responses(
        (status = 201, description = "Store created", body = ApiResponse<Store>),
        (status = 400, description = "Invalid subdomain, taken subdomain or unknown template")
    ),
    security(("bearer_auth" = [])),
    tag = "Stores"
)]
pub async fn create_store(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateStoreRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Store>>)> {
    let resp = store_service::create_store(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/stores/init",
    request_body = CreateStoreRequest,
    responses(
        (status = 201, description = "Store created with sample catalog and home layout", body = ApiResponse<InitStoreResponse>),
        (status = 400, description = "Invalid subdomain, taken subdomain or unknown template")
    ),
    security(("bearer_auth" = [])),
    tag = "Stores"
)]
pub async fn init_store(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateStoreRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<InitStoreResponse>>)> {
    let resp = store_service::init_store(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/stores/{id}",
    params(("id" = Uuid, Path, description = "Store ID")),
    responses(
        (status = 200, description = "Store", body = ApiResponse<Store>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Store not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Stores"
)]
pub async fn get_store(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Store>>> {
    let resp = store_service::get_store(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/stores/{id}",
    params(("id" = Uuid, Path, description = "Store ID")),
    request_body = UpdateStoreRequest,
    responses(
        (status = 200, description = "Store updated", body = ApiResponse<Store>),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Store not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Stores"
)]
pub async fn update_store(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStoreRequest>,
) -> AppResult<Json<ApiResponse<Store>>> {
    let resp = store_service::update_store(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/stores/{id}/publish",
    params(("id" = Uuid, Path, description = "Store ID")),
    responses(
        (status = 200, description = "Deployment recorded", body = ApiResponse<Deployment>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Store not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Deployments"
)]
pub async fn publish_store(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Deployment>>> {
    let resp = deployment_service::publish(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/stores/{id}/unpublish",
    params(("id" = Uuid, Path, description = "Store ID")),
    responses(
        (status = 200, description = "Store taken offline", body = ApiResponse<Store>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Store not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Deployments"
)]
pub async fn unpublish_store(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Store>>> {
    let resp = deployment_service::unpublish(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/stores/{id}/deployments",
    params(("id" = Uuid, Path, description = "Store ID")),
    responses(
        (status = 200, description = "Deployments, newest first", body = ApiResponse<DeploymentList>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Store not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Deployments"
)]
pub async fn list_deployments(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<DeploymentList>>> {
    let resp = deployment_service::list_deployments(&state, &user, id).await?;
    Ok(Json(resp))
}

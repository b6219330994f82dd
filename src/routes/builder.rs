use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    builder::BuilderComponent,
    dto::builder::{
        AddComponentRequest, MoveComponentRequest, PageLayoutResponse, SaveLayoutRequest,
        UpdateComponentRequest, WidgetPalette,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::builder_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/builder/components", get(palette))
        .route("/stores/{id}/pages/{page}", get(get_layout).put(save_layout))
        .route("/stores/{id}/pages/{page}/components", post(add_component))
        .route("/stores/{id}/pages/{page}/move", post(move_component))
        .route(
            "/stores/{id}/pages/{page}/components/{component_id}",
            patch(update_component).delete(remove_component),
        )
}

#[utoipa::path(
    get,
    path = "/api/builder/components",
    responses(
        (status = 200, description = "Widget palette", body = ApiResponse<WidgetPalette>)
    ),
    tag = "Builder"
)]
pub async fn palette() -> Json<ApiResponse<WidgetPalette>> {
    Json(builder_service::palette())
}

#[utoipa::path(
    get,
    path = "/api/stores/{id}/pages/{page}",
    params(
        ("id" = Uuid, Path, description = "Store ID"),
        ("page" = String, Path, description = "Page name"),
    ),
    responses(
        (status = 200, description = "Saved layout, empty when never saved", body = ApiResponse<PageLayoutResponse>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Store not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Builder"
)]
pub async fn get_layout(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, page)): Path<(Uuid, String)>,
) -> AppResult<Json<ApiResponse<PageLayoutResponse>>> {
    let resp = builder_service::get_layout(&state, &user, id, &page).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/stores/{id}/pages/{page}",
    params(
        ("id" = Uuid, Path, description = "Store ID"),
        ("page" = String, Path, description = "Page name"),
    ),
    request_body = SaveLayoutRequest,
    responses(
        (status = 200, description = "Layout saved", body = ApiResponse<PageLayoutResponse>),
        (status = 400, description = "Invalid layout"),
        (status = 403, description = "Not the owner")
    ),
    security(("bearer_auth" = [])),
    tag = "Builder"
)]
pub async fn save_layout(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, page)): Path<(Uuid, String)>,
    Json(payload): Json<SaveLayoutRequest>,
) -> AppResult<Json<ApiResponse<PageLayoutResponse>>> {
    let resp = builder_service::save_layout(&state, &user, id, &page, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/stores/{id}/pages/{page}/components",
    params(
        ("id" = Uuid, Path, description = "Store ID"),
        ("page" = String, Path, description = "Page name"),
    ),
    request_body = AddComponentRequest,
    responses(
        (status = 200, description = "Component added", body = ApiResponse<PageLayoutResponse>),
        (status = 400, description = "Unknown widget or position out of range"),
        (status = 403, description = "Not the owner")
    ),
    security(("bearer_auth" = [])),
    tag = "Builder"
)]
pub async fn add_component(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, page)): Path<(Uuid, String)>,
    Json(payload): Json<AddComponentRequest>,
) -> AppResult<Json<ApiResponse<PageLayoutResponse>>> {
    let resp = builder_service::add_component(&state, &user, id, &page, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/stores/{id}/pages/{page}/move",
    params(
        ("id" = Uuid, Path, description = "Store ID"),
        ("page" = String, Path, description = "Page name"),
    ),
    request_body = MoveComponentRequest,
    responses(
        (status = 200, description = "Component moved", body = ApiResponse<PageLayoutResponse>),
        (status = 400, description = "Position out of range"),
        (status = 403, description = "Not the owner")
    ),
    security(("bearer_auth" = [])),
    tag = "Builder"
)]
pub async fn move_component(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, page)): Path<(Uuid, String)>,
    Json(payload): Json<MoveComponentRequest>,
) -> AppResult<Json<ApiResponse<PageLayoutResponse>>> {
    let resp = builder_service::move_component(&state, &user, id, &page, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/stores/{id}/pages/{page}/components/{component_id}",
    params(
        ("id" = Uuid, Path, description = "Store ID"),
        ("page" = String, Path, description = "Page name"),
        ("component_id" = String, Path, description = "Component ID"),
    ),
    request_body = UpdateComponentRequest,
    responses(
        (status = 200, description = "Props merged", body = ApiResponse<PageLayoutResponse>),
        (status = 400, description = "Props are not an object"),
        (status = 404, description = "Component not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Builder"
)]
pub async fn update_component(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, page, component_id)): Path<(Uuid, String, String)>,
    Json(payload): Json<UpdateComponentRequest>,
) -> AppResult<Json<ApiResponse<PageLayoutResponse>>> {
    let resp =
        builder_service::update_component(&state, &user, id, &page, &component_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/stores/{id}/pages/{page}/components/{component_id}",
    params(
        ("id" = Uuid, Path, description = "Store ID"),
        ("page" = String, Path, description = "Page name"),
        ("component_id" = String, Path, description = "Component ID"),
    ),
    responses(
        (status = 200, description = "Removed component", body = ApiResponse<BuilderComponent>),
        (status = 404, description = "Component not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Builder"
)]
pub async fn remove_component(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, page, component_id)): Path<(Uuid, String, String)>,
) -> AppResult<Json<ApiResponse<BuilderComponent>>> {
    let resp = builder_service::remove_component(&state, &user, id, &page, &component_id).await?;
    Ok(Json(resp))
}

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    dto::products::{
        AmazonImportRequest, DuplicateCheckRequest, DuplicateCheckResponse, ImportRequest,
        ImportSummary, ProductInput, ProductList, SeedSummary, UpdateProductRequest,
    },
    error::AppResult,
    middleware::auth::{AuthUser, MaybeAuthUser},
    models::Product,
    response::ApiResponse,
    routes::params::ProductQuery,
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stores/{id}/products", get(list_products).post(create_product))
        .route("/stores/{id}/products/check-duplicate", post(check_duplicate))
        .route("/stores/{id}/products/import", post(import_products))
        .route("/stores/{id}/products/import/amazon", post(import_amazon))
        .route("/stores/{id}/products/seed", post(seed_products))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

#[utoipa::path(
    get,
    path = "/api/stores/{id}/products",
    params(
        ("id" = Uuid, Path, description = "Store ID"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Search in name or description"),
        ("category" = Option<String>, Query, description = "Category filter"),
        ("include_inactive" = Option<bool>, Query, description = "Owners only: include soft-deleted products"),
        ("sort_by" = Option<String>, Query, description = "created_at | price | name"),
        ("sort_order" = Option<String>, Query, description = "asc | desc"),
    ),
    responses(
        (status = 200, description = "List products", body = ApiResponse<ProductList>),
        (status = 404, description = "Unknown or unpublished store")
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = product_service::list_products(&state, viewer.as_ref(), id, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::get_product(&state, viewer.as_ref(), id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/stores/{id}/products",
    params(("id" = Uuid, Path, description = "Store ID")),
    request_body = ProductInput,
    responses(
        (status = 201, description = "Create product", body = ApiResponse<Product>),
        (status = 400, description = "Invalid product"),
        (status = 403, description = "Not the owner")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProductInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let resp = product_service::create_product(&state, &user, id, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Update product", body = ApiResponse<Product>),
        (status = 400, description = "Invalid product"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::update_product(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deactivated"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let resp = product_service::delete_product(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/stores/{id}/products/check-duplicate",
    params(("id" = Uuid, Path, description = "Store ID")),
    request_body = DuplicateCheckRequest,
    responses(
        (status = 200, description = "Duplicate lookup", body = ApiResponse<DuplicateCheckResponse>),
        (status = 403, description = "Not the owner")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn check_duplicate(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<DuplicateCheckRequest>,
) -> AppResult<Json<ApiResponse<DuplicateCheckResponse>>> {
    let resp = product_service::check_duplicate(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/stores/{id}/products/import",
    params(("id" = Uuid, Path, description = "Store ID")),
    request_body = ImportRequest,
    responses(
        (status = 200, description = "Import summary", body = ApiResponse<ImportSummary>),
        (status = 400, description = "Invalid item"),
        (status = 403, description = "Not the owner")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn import_products(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ImportRequest>,
) -> AppResult<Json<ApiResponse<ImportSummary>>> {
    let resp = product_service::import_products(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/stores/{id}/products/import/amazon",
    params(("id" = Uuid, Path, description = "Store ID")),
    request_body = AmazonImportRequest,
    responses(
        (status = 200, description = "Import summary", body = ApiResponse<ImportSummary>),
        (status = 400, description = "Invalid listing"),
        (status = 403, description = "Not the owner")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn import_amazon(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AmazonImportRequest>,
) -> AppResult<Json<ApiResponse<ImportSummary>>> {
    let resp = product_service::import_amazon(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/stores/{id}/products/seed",
    params(("id" = Uuid, Path, description = "Store ID")),
    responses(
        (status = 200, description = "Sample catalog inserted", body = ApiResponse<SeedSummary>),
        (status = 403, description = "Not the owner")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn seed_products(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<SeedSummary>>> {
    let resp = product_service::seed_products(&state, &user, id).await?;
    Ok(Json(resp))
}

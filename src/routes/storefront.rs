use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    dto::{
        orders::{CheckoutRequest, CheckoutResponse, QuoteRequest, QuoteResponse},
        stores::StorefrontView,
    },
    error::AppResult,
    middleware::auth::MaybeAuthUser,
    response::ApiResponse,
    services::{order_service, storefront_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{subdomain}", get(get_storefront))
        .route("/{subdomain}/cart/quote", post(quote))
        .route("/{subdomain}/checkout", post(checkout))
}

#[utoipa::path(
    get,
    path = "/api/storefront/{subdomain}",
    params(("subdomain" = String, Path, description = "Store subdomain")),
    responses(
        (status = 200, description = "Storefront view model", body = ApiResponse<StorefrontView>),
        (status = 404, description = "Unknown or unpublished store")
    ),
    tag = "Storefront"
)]
pub async fn get_storefront(
    State(state): State<AppState>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Path(subdomain): Path<String>,
) -> AppResult<Json<ApiResponse<StorefrontView>>> {
    let resp = storefront_service::get_storefront(&state, viewer.as_ref(), &subdomain).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/storefront/{subdomain}/cart/quote",
    params(("subdomain" = String, Path, description = "Store subdomain")),
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Cart totals", body = ApiResponse<QuoteResponse>),
        (status = 400, description = "Empty cart or unavailable product"),
        (status = 404, description = "Unknown or unpublished store")
    ),
    tag = "Storefront"
)]
pub async fn quote(
    State(state): State<AppState>,
    Path(subdomain): Path<String>,
    Json(payload): Json<QuoteRequest>,
) -> AppResult<Json<ApiResponse<QuoteResponse>>> {
    let resp = order_service::quote_cart(&state, &subdomain, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/storefront/{subdomain}/checkout",
    params(("subdomain" = String, Path, description = "Store subdomain")),
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Order placed", body = ApiResponse<CheckoutResponse>),
        (status = 400, description = "Invalid order or insufficient stock"),
        (status = 404, description = "Unknown or unpublished store")
    ),
    tag = "Storefront"
)]
pub async fn checkout(
    State(state): State<AppState>,
    Path(subdomain): Path<String>,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CheckoutResponse>>)> {
    let resp = order_service::checkout(&state, &subdomain, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

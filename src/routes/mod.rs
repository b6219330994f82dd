use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod api_keys;
pub mod auth;
pub mod builder;
pub mod doc;
pub mod health;
pub mod orders;
pub mod params;
pub mod payments;
pub mod products;
pub mod storefront;
pub mod stores;
pub mod templates;

// Every module registers full paths relative to `/api`; state is bound at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/templates", templates::router())
        .nest("/storefront", storefront::router())
        .nest("/payments", payments::router())
        .nest("/api-keys", api_keys::router())
        .merge(stores::router())
        .merge(products::router())
        .merge(builder::router())
        .merge(orders::router())
}

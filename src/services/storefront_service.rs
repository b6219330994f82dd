use uuid::Uuid;

use crate::{
    builder::{self, Layout},
    dto::stores::StorefrontView,
    entity::stores::Model as StoreModel,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Product,
    pricing::PricingConfig,
    response::ApiResponse,
    services::{builder_service, order_service, product_service, store_service},
    state::AppState,
    templates::{self, Template},
};

/// Assemble the view model every template renders from.
pub fn render_storefront(
    store: StoreModel,
    template: &Template,
    saved_pages: &[String],
    products: Vec<Product>,
    layout: Layout,
    pricing: PricingConfig,
) -> StorefrontView {
    let mut pages: Vec<String> = template.pages.iter().map(|p| p.to_string()).collect();
    for page in saved_pages {
        if !pages.contains(page) {
            pages.push(page.clone());
        }
    }

    StorefrontView {
        store: store.into(),
        theme: *template,
        pages,
        layout,
        products,
        pricing,
    }
}

async fn saved_pages(state: &AppState, store_id: Uuid) -> AppResult<Vec<String>> {
    let pages = sqlx::query_scalar::<_, String>(
        "SELECT page FROM page_layouts WHERE store_id = $1 ORDER BY page",
    )
    .bind(store_id)
    .fetch_all(&state.pool)
    .await?;
    Ok(pages)
}

pub async fn get_storefront(
    state: &AppState,
    viewer: Option<&AuthUser>,
    subdomain: &str,
) -> AppResult<ApiResponse<StorefrontView>> {
    let store = store_service::find_by_subdomain(state, subdomain).await?;
    let is_owner = viewer.is_some_and(|u| u.user_id == store.user_id || u.is_admin());
    if !store.is_published && !is_owner {
        return Err(AppError::NotFound);
    }

    let template = templates::resolve(&store.template_id);
    let mut layout = builder_service::load_layout(state, store.id, "home").await?;
    if layout.is_empty() {
        layout = builder::from_template(template);
    }
    let pages = saved_pages(state, store.id).await?;
    let products = product_service::active_products(state, store.id).await?;
    let pricing = order_service::pricing_for(state, &store);

    tracing::debug!(store_id = %store.id, template = template.id, products = products.len(), "storefront rendered");

    Ok(ApiResponse::success(
        "Storefront",
        render_storefront(store, template, &pages, products, layout, pricing),
        None,
    ))
}

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use crate::{
    dto::{
        products::ProductList,
        templates::{TemplateList, TemplateQuery},
    },
    error::AppResult,
    response::ApiResponse,
    routes::params::Pagination,
    services::template_service,
    state::AppState,
    templates::Template,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_templates))
        .route("/{id}", get(get_template))
        .route("/{id}/products", get(template_products))
}

#[utoipa::path(
    get,
    path = "/api/templates",
    params(
        ("category" = Option<String>, Query, description = "Template category"),
        ("feature" = Option<String>, Query, description = "Feature tag"),
    ),
    responses(
        (status = 200, description = "Storefront templates", body = ApiResponse<TemplateList>)
    ),
    tag = "Templates"
)]
pub async fn list_templates(Query(query): Query<TemplateQuery>) -> Json<ApiResponse<TemplateList>> {
    Json(template_service::list_templates(query))
}

#[utoipa::path(
    get,
    path = "/api/templates/{id}",
    params(("id" = String, Path, description = "Template ID")),
    responses(
        (status = 200, description = "Template", body = ApiResponse<Template>),
        (status = 404, description = "Unknown template")
    ),
    tag = "Templates"
)]
pub async fn get_template(Path(id): Path<String>) -> AppResult<Json<ApiResponse<Template>>> {
    let resp = template_service::get_template(&id)?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/templates/{id}/products",
    params(
        ("id" = String, Path, description = "Template ID"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "Products of published stores on this template", body = ApiResponse<ProductList>),
        (status = 404, description = "Unknown template")
    ),
    tag = "Templates"
)]
pub async fn template_products(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<Pagination>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = template_service::template_products(&state, &id, query).await?;
    Ok(Json(resp))
}

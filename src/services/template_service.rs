use sea_orm::{
    ColumnTrait, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait,
};

use crate::{
    dto::{
        products::ProductList,
        templates::{TemplateList, TemplateQuery},
    },
    entity::{
        products::{self, Column as ProdCol, Entity as Products},
        stores::Column as StoreCol,
    },
    error::{AppError, AppResult},
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
    templates::{self, Template},
};

pub fn list_templates(query: TemplateQuery) -> ApiResponse<TemplateList> {
    let items: Vec<Template> = templates::filter(query.category.as_deref(), query.feature.as_deref())
        .into_iter()
        .copied()
        .collect();
    let total = items.len() as i64;
    ApiResponse::success("Templates", TemplateList { items }, Some(Meta::new(1, total, total)))
}

pub fn get_template(id: &str) -> AppResult<ApiResponse<Template>> {
    let template = templates::find(id).ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Template", *template, None))
}

/// Active products of published stores built on a template.
pub async fn template_products(
    state: &AppState,
    id: &str,
    query: Pagination,
) -> AppResult<ApiResponse<ProductList>> {
    let template = templates::find(id).ok_or(AppError::NotFound)?;
    let (page, limit, offset) = query.normalize();

    let finder = Products::find()
        .join(JoinType::InnerJoin, products::Relation::Stores.def())
        .filter(StoreCol::TemplateId.eq(template.id))
        .filter(StoreCol::IsPublished.eq(true))
        .filter(ProdCol::IsActive.eq(true))
        .order_by_desc(ProdCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    Ok(ApiResponse::success(
        "Template products",
        ProductList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    audit,
    catalog::{self, AMAZON_SOURCE},
    dto::products::{
        AmazonImportRequest, DuplicateCheckRequest, DuplicateCheckResponse, DuplicateStrategy,
        ImportRequest, ImportSummary, ProductInput, ProductList, SeedSummary, UpdateProductRequest,
    },
    entity::{
        products::{self, Column, Entity as Products, Model as ProductModel},
        stores::Model as StoreModel,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::{ProductQuery, ProductSortBy, SortOrder},
    services::store_service,
    state::AppState,
    templates,
};

fn validate_input(input: &ProductInput) -> AppResult<()> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("Product name is required".into()));
    }
    if input.price < Decimal::ZERO {
        return Err(AppError::BadRequest("Price must not be negative".into()));
    }
    if input.stock_quantity < 0 {
        return Err(AppError::BadRequest("Stock must not be negative".into()));
    }
    Ok(())
}

fn images_json(images: &[String]) -> Value {
    Value::Array(
        images
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| Value::String(s.to_string()))
            .collect(),
    )
}

fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

async fn insert_product<C: ConnectionTrait>(
    conn: &C,
    store_id: Uuid,
    input: &ProductInput,
    source: &str,
) -> AppResult<ProductModel> {
    validate_input(input)?;
    let product = products::ActiveModel {
        id: Set(Uuid::new_v4()),
        store_id: Set(store_id),
        name: Set(input.name.trim().to_string()),
        description: Set(clean_optional(input.description.clone())),
        price: Set(input.price.round_dp(2)),
        images: Set(images_json(&input.images)),
        sku: Set(clean_optional(input.sku.clone())),
        stock_quantity: Set(input.stock_quantity),
        is_active: Set(true),
        metadata: Set(catalog::import_metadata(input, source)),
        // `now()` is fixed per transaction; a client timestamp keeps batch order.
        created_at: Set(Utc::now().into()),
        updated_at: NotSet,
    }
    .insert(conn)
    .await?;
    Ok(product)
}

/// Overwrite a matched product with imported data and reactivate it.
async fn overwrite_product<C: ConnectionTrait>(
    conn: &C,
    existing: ProductModel,
    input: &ProductInput,
    source: &str,
) -> AppResult<ProductModel> {
    validate_input(input)?;
    let mut metadata = existing.metadata.as_object().cloned().unwrap_or_default();
    if let Value::Object(imported) = catalog::import_metadata(input, source) {
        metadata.extend(imported);
    }

    let mut active: products::ActiveModel = existing.into();
    active.name = Set(input.name.trim().to_string());
    active.description = Set(clean_optional(input.description.clone()));
    active.price = Set(input.price.round_dp(2));
    if !input.images.is_empty() {
        active.images = Set(images_json(&input.images));
    }
    if let Some(sku) = clean_optional(input.sku.clone()) {
        active.sku = Set(Some(sku));
    }
    active.stock_quantity = Set(input.stock_quantity);
    active.is_active = Set(true);
    active.metadata = Set(Value::Object(metadata));
    active.updated_at = Set(Utc::now().into());
    Ok(active.update(conn).await?)
}

/// Products of a store in creation order, active or not.
async fn store_products<C: ConnectionTrait>(conn: &C, store_id: Uuid) -> AppResult<Vec<ProductModel>> {
    Ok(Products::find()
        .filter(Column::StoreId.eq(store_id))
        .order_by_asc(Column::CreatedAt)
        .order_by_asc(Column::Id)
        .all(conn)
        .await?)
}

/// Public reads see published stores; owners and admins see everything.
fn can_view_private(store: &StoreModel, viewer: Option<&AuthUser>) -> bool {
    viewer.is_some_and(|u| u.user_id == store.user_id || u.is_admin())
}

pub async fn list_products(
    state: &AppState,
    viewer: Option<&AuthUser>,
    store_id: Uuid,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let store = store_service::find_store(state, store_id).await?;
    let private = can_view_private(&store, viewer);
    if !store.is_published && !private {
        return Err(AppError::NotFound);
    }

    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all().add(Column::StoreId.eq(store_id));

    if !(private && query.include_inactive.unwrap_or(false)) {
        condition = condition.add(Column::IsActive.eq(true));
    }

    if let Some(search) = query.q.as_ref().filter(|s| !s.trim().is_empty()) {
        let pattern = format!("%{}%", search.trim());
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Description).ilike(pattern)),
        );
    }

    if let Some(category) = query.category.as_ref().filter(|s| !s.trim().is_empty()) {
        condition = condition.add(Expr::cust_with_values(
            "lower(products.metadata->>'category') = lower($1)",
            [category.trim().to_string()],
        ));
    }

    let sort_col = match query.sort_by.unwrap_or(ProductSortBy::CreatedAt) {
        ProductSortBy::CreatedAt => Column::CreatedAt,
        ProductSortBy::Price => Column::Price,
        ProductSortBy::Name => Column::Name,
    };

    let mut finder = Products::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub async fn get_product(
    state: &AppState,
    viewer: Option<&AuthUser>,
    id: Uuid,
) -> AppResult<ApiResponse<Product>> {
    let product = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let store = store_service::find_store(state, product.store_id).await?;
    if !can_view_private(&store, viewer) && !(store.is_published && product.is_active) {
        return Err(AppError::NotFound);
    }
    Ok(ApiResponse::success("Product", product.into(), None))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    store_id: Uuid,
    payload: ProductInput,
) -> AppResult<ApiResponse<Product>> {
    let store = store_service::owned_store(state, user, store_id).await?;
    let source = payload
        .metadata
        .as_ref()
        .map(catalog::product_source)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "manual".to_string());
    let product = insert_product(&state.orm, store.id, &payload, &source).await?;

    audit::record(
        &state.orm,
        Some(user.user_id),
        "product_create",
        "products",
        serde_json::json!({ "product_id": product.id, "store_id": store.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Product created",
        product.into(),
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    store_service::owned_store(state, user, existing.store_id).await?;

    let metadata = match payload.metadata {
        Some(patch) => Some(store_service::merge_settings(&existing.metadata, patch)?),
        None => None,
    };

    let mut active: products::ActiveModel = existing.into();
    if let Some(name) = payload.name {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest("Product name is required".into()));
        }
        active.name = Set(name.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(clean_optional(Some(description)));
    }
    if let Some(price) = payload.price {
        if price < Decimal::ZERO {
            return Err(AppError::BadRequest("Price must not be negative".into()));
        }
        active.price = Set(price.round_dp(2));
    }
    if let Some(images) = payload.images {
        active.images = Set(images_json(&images));
    }
    if let Some(sku) = payload.sku {
        active.sku = Set(clean_optional(Some(sku)));
    }
    if let Some(stock) = payload.stock_quantity {
        if stock < 0 {
            return Err(AppError::BadRequest("Stock must not be negative".into()));
        }
        active.stock_quantity = Set(stock);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    if let Some(metadata) = metadata {
        active.metadata = Set(metadata);
    }
    active.updated_at = Set(Utc::now().into());

    let product = active.update(&state.orm).await?;

    audit::record(
        &state.orm,
        Some(user.user_id),
        "product_update",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::success("Updated", product.into(), Some(Meta::empty())))
}

/// Soft delete: the row stays, `is_active` goes false.
pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    store_service::owned_store(state, user, existing.store_id).await?;

    let mut active: products::ActiveModel = existing.into();
    active.is_active = Set(false);
    active.updated_at = Set(Utc::now().into());
    active.update(&state.orm).await?;

    audit::record(
        &state.orm,
        Some(user.user_id),
        "product_delete",
        "products",
        serde_json::json!({ "product_id": id }),
    )
    .await;

    Ok(ApiResponse::ack("Deleted"))
}

pub async fn check_duplicate(
    state: &AppState,
    user: &AuthUser,
    store_id: Uuid,
    payload: DuplicateCheckRequest,
) -> AppResult<ApiResponse<DuplicateCheckResponse>> {
    let store = store_service::owned_store(state, user, store_id).await?;
    let products = store_products(&state.orm, store.id).await?;
    let found = catalog::find_duplicate(&products, &payload.name, &payload.source);

    Ok(ApiResponse::success(
        "Duplicate check",
        DuplicateCheckResponse {
            exists: found.is_some(),
            product_id: found.map(|p| p.id),
        },
        None,
    ))
}

async fn run_import(
    state: &AppState,
    user: &AuthUser,
    store_id: Uuid,
    source: &str,
    strategy: DuplicateStrategy,
    items: Vec<ProductInput>,
) -> AppResult<ImportSummary> {
    let store = store_service::owned_store(state, user, store_id).await?;
    if items.is_empty() {
        return Err(AppError::BadRequest("Nothing to import".into()));
    }
    for item in &items {
        validate_input(item)?;
    }

    let txn = state.orm.begin().await?;
    let mut existing = store_products(&txn, store.id).await?;
    let mut summary = ImportSummary::default();

    for item in &items {
        let matched = existing
            .iter()
            .position(|p| catalog::is_duplicate(p, &item.name, source));
        match (matched, strategy) {
            (Some(index), DuplicateStrategy::Skip) => summary.skipped.push(existing[index].id),
            (Some(index), DuplicateStrategy::Update) => {
                let updated = overwrite_product(&txn, existing[index].clone(), item, source).await?;
                summary.updated.push(updated.id);
                existing[index] = updated;
            }
            (None, _) => {
                let created = insert_product(&txn, store.id, item, source).await?;
                summary.created.push(created.id);
                existing.push(created);
            }
        }
    }

    txn.commit().await?;

    tracing::info!(
        store_id = %store.id,
        source,
        created = summary.created.len(),
        updated = summary.updated.len(),
        skipped = summary.skipped.len(),
        "products imported"
    );
    audit::record(
        &state.orm,
        Some(user.user_id),
        "product_import",
        "products",
        serde_json::json!({
            "store_id": store.id,
            "source": source,
            "created": summary.created.len(),
            "updated": summary.updated.len(),
            "skipped": summary.skipped.len(),
        }),
    )
    .await;

    Ok(summary)
}

pub async fn import_products(
    state: &AppState,
    user: &AuthUser,
    store_id: Uuid,
    payload: ImportRequest,
) -> AppResult<ApiResponse<ImportSummary>> {
    let source = payload.source.trim().to_string();
    if source.is_empty() {
        return Err(AppError::BadRequest("source is required".into()));
    }
    let summary = run_import(state, user, store_id, &source, payload.on_duplicate, payload.items).await?;
    Ok(ApiResponse::success("Import finished", summary, Some(Meta::empty())))
}

pub async fn import_amazon(
    state: &AppState,
    user: &AuthUser,
    store_id: Uuid,
    payload: AmazonImportRequest,
) -> AppResult<ApiResponse<ImportSummary>> {
    let items = payload.items.into_iter().map(catalog::from_amazon).collect();
    let summary = run_import(state, user, store_id, AMAZON_SOURCE, payload.on_duplicate, items).await?;
    Ok(ApiResponse::success("Import finished", summary, Some(Meta::empty())))
}

/// Insert the template's sample catalog, skipping names the store already has.
pub async fn seed_store<C: ConnectionTrait>(conn: &C, store: &StoreModel) -> AppResult<SeedSummary> {
    let template = templates::resolve(&store.template_id);
    let existing = store_products(conn, store.id).await?;

    let mut created = 0;
    let mut skipped = 0;
    for sample in catalog::sample_products(template.category) {
        let taken = existing
            .iter()
            .any(|p| catalog::normalize_name(&p.name) == catalog::normalize_name(sample.name));
        if taken {
            skipped += 1;
            continue;
        }
        insert_product(conn, store.id, &sample.to_input(), "sample").await?;
        created += 1;
    }

    tracing::debug!(store_id = %store.id, created, skipped, "sample products seeded");
    Ok(SeedSummary { created, skipped })
}

pub async fn seed_products(
    state: &AppState,
    user: &AuthUser,
    store_id: Uuid,
) -> AppResult<ApiResponse<SeedSummary>> {
    let store = store_service::owned_store(state, user, store_id).await?;
    let summary = seed_store(&state.orm, &store).await?;

    audit::record(
        &state.orm,
        Some(user.user_id),
        "product_seed",
        "products",
        serde_json::json!({ "store_id": store.id, "created": summary.created }),
    )
    .await;

    Ok(ApiResponse::success("Sample products seeded", summary, Some(Meta::empty())))
}

/// Active products of a store for storefront rendering.
pub async fn active_products(state: &AppState, store_id: Uuid) -> AppResult<Vec<Product>> {
    Ok(Products::find()
        .filter(Column::StoreId.eq(store_id))
        .filter(Column::IsActive.eq(true))
        .order_by_desc(Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect())
}

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    audit, builder,
    dto::stores::{CreateStoreRequest, InitStoreResponse, StoreList, StoreListQuery, UpdateStoreRequest},
    entity::stores::{self, Column as StoreCol, Entity as Stores, Model as StoreModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_owner_or_admin},
    models::Store,
    response::{ApiResponse, Meta},
    services::{builder_service, product_service},
    state::AppState,
    templates,
};

/// Lower-cased subdomain if it is 3-63 chars of `[a-z0-9-]` without a
/// leading or trailing hyphen.
pub fn validate_subdomain(raw: &str) -> AppResult<String> {
    let subdomain = raw.trim().to_lowercase();
    let valid_chars = subdomain
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !(3..=63).contains(&subdomain.len())
        || !valid_chars
        || subdomain.starts_with('-')
        || subdomain.ends_with('-')
    {
        return Err(AppError::BadRequest(
            "Subdomain must be 3-63 characters of a-z, 0-9 or '-' and not start or end with '-'"
                .into(),
        ));
    }
    Ok(subdomain)
}

fn validate_template(template_id: Option<&str>) -> AppResult<&'static str> {
    match template_id.map(str::trim).filter(|t| !t.is_empty()) {
        None => Ok(templates::DEFAULT_TEMPLATE_ID),
        Some(id) => templates::find(id)
            .map(|t| t.id)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown template '{id}'"))),
    }
}

/// Shallow merge; `null` values delete the key.
pub fn merge_settings(current: &Value, patch: Value) -> AppResult<Value> {
    let Value::Object(patch) = patch else {
        return Err(AppError::BadRequest("settings must be a JSON object".into()));
    };
    let mut merged = current.as_object().cloned().unwrap_or_default();
    for (key, value) in patch {
        if value.is_null() {
            merged.remove(&key);
        } else {
            merged.insert(key, value);
        }
    }
    Ok(Value::Object(merged))
}

pub async fn find_store(state: &AppState, id: Uuid) -> AppResult<StoreModel> {
    Stores::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

/// Load a store the caller may manage.
pub async fn owned_store(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<StoreModel> {
    let store = find_store(state, id).await?;
    ensure_owner_or_admin(user, store.user_id)?;
    Ok(store)
}

pub async fn find_by_subdomain(state: &AppState, subdomain: &str) -> AppResult<StoreModel> {
    Stores::find()
        .filter(StoreCol::Subdomain.eq(subdomain.trim().to_lowercase()))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

async fn insert_store<C: ConnectionTrait>(
    conn: &C,
    user: &AuthUser,
    payload: CreateStoreRequest,
) -> AppResult<StoreModel> {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::BadRequest("Store name is required".into()));
    }
    let subdomain = validate_subdomain(&payload.subdomain)?;
    let template_id = validate_template(payload.template_id.as_deref())?;
    let settings = match payload.settings {
        Some(settings) => merge_settings(&Value::Object(Default::default()), settings)?,
        None => Value::Object(Default::default()),
    };

    let taken = Stores::find()
        .filter(StoreCol::Subdomain.eq(subdomain.as_str()))
        .one(conn)
        .await?;
    if taken.is_some() {
        return Err(subdomain_taken());
    }

    // A concurrent create can still win the race; the unique index decides.
    let store = stores::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        name: Set(name),
        subdomain: Set(subdomain),
        template_id: Set(template_id.to_string()),
        is_published: Set(false),
        settings: Set(settings),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(conn)
    .await
    .map_err(unique_violation_as_taken)?;

    tracing::info!(store_id = %store.id, subdomain = %store.subdomain, "store created");
    Ok(store)
}

fn subdomain_taken() -> AppError {
    AppError::BadRequest("Subdomain is already taken".into())
}

/// Map a unique-index violation on insert to the same 400 as the pre-check.
fn unique_violation_as_taken(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => subdomain_taken(),
        _ => AppError::from(err),
    }
}

async fn record_created(state: &AppState, user: &AuthUser, store: &StoreModel) {
    audit::record(
        &state.orm,
        Some(user.user_id),
        "store_create",
        "stores",
        serde_json::json!({ "store_id": store.id, "template_id": store.template_id }),
    )
    .await;
}

pub async fn create_store(
    state: &AppState,
    user: &AuthUser,
    payload: CreateStoreRequest,
) -> AppResult<ApiResponse<Store>> {
    let store = insert_store(&state.orm, user, payload).await?;
    record_created(state, user, &store).await;
    Ok(ApiResponse::success("Store created", store.into(), Some(Meta::empty())))
}

/// Create a store, seed its template's sample catalog and save the default home layout.
/// All three steps commit together; a failure leaves no store behind.
pub async fn init_store(
    state: &AppState,
    user: &AuthUser,
    payload: CreateStoreRequest,
) -> AppResult<ApiResponse<InitStoreResponse>> {
    let txn = state.orm.begin().await?;
    let store = insert_store(&txn, user, payload).await?;
    let template = templates::resolve(&store.template_id);

    let seeded = product_service::seed_store(&txn, &store).await?;
    let layout = builder::from_template(template);
    builder_service::persist_layout(&txn, store.id, "home", &layout).await?;
    txn.commit().await?;

    record_created(state, user, &store).await;

    Ok(ApiResponse::success(
        "Store initialised",
        InitStoreResponse {
            store: store.into(),
            seeded_products: seeded.created,
            layout,
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_stores(
    state: &AppState,
    user: &AuthUser,
    query: StoreListQuery,
) -> AppResult<ApiResponse<StoreList>> {
    let mut finder = Stores::find();
    if !(query.all.unwrap_or(false) && user.is_admin()) {
        finder = finder.filter(StoreCol::UserId.eq(user.user_id));
    }
    let items: Vec<Store> = finder
        .order_by_desc(StoreCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Store::from)
        .collect();
    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Stores",
        StoreList { items },
        Some(Meta::new(1, total, total)),
    ))
}

pub async fn get_store(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<ApiResponse<Store>> {
    let store = owned_store(state, user, id).await?;
    Ok(ApiResponse::success("Store", store.into(), None))
}

pub async fn update_store(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateStoreRequest,
) -> AppResult<ApiResponse<Store>> {
    let existing = owned_store(state, user, id).await?;
    let settings = match payload.settings {
        Some(patch) => Some(merge_settings(&existing.settings, patch)?),
        None => None,
    };

    let mut active: stores::ActiveModel = existing.into();
    if let Some(name) = payload.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::BadRequest("Store name is required".into()));
        }
        active.name = Set(name);
    }
    if let Some(template_id) = payload.template_id {
        active.template_id = Set(validate_template(Some(&template_id))?.to_string());
    }
    if let Some(settings) = settings {
        active.settings = Set(settings);
    }
    active.updated_at = Set(Utc::now().into());
    let store = active.update(&state.orm).await?;

    audit::record(
        &state.orm,
        Some(user.user_id),
        "store_update",
        "stores",
        serde_json::json!({ "store_id": store.id }),
    )
    .await;

    Ok(ApiResponse::success("Store updated", store.into(), Some(Meta::empty())))
}

use chrono::Utc;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, sea_query::OnConflict};
use uuid::Uuid;

use crate::{
    audit,
    builder::{self, BuilderComponent, Layout},
    dto::builder::{
        AddComponentRequest, MoveComponentRequest, PageLayoutResponse, SaveLayoutRequest,
        UpdateComponentRequest, WidgetPalette,
    },
    entity::page_layouts::{self, Column as LayoutCol, Entity as PageLayouts},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    services::store_service,
    state::AppState,
};

fn validate_page(page: &str) -> AppResult<String> {
    let page = page.trim().to_lowercase();
    let valid = !page.is_empty()
        && page.len() <= 64
        && page
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if !valid {
        return Err(AppError::BadRequest("Invalid page name".into()));
    }
    Ok(page)
}

pub fn palette() -> ApiResponse<WidgetPalette> {
    ApiResponse::success(
        "Builder components",
        WidgetPalette {
            items: builder::palette(),
        },
        Some(Meta::empty()),
    )
}

/// Saved layout for a page; pages never saved read as empty.
pub async fn load_layout(state: &AppState, store_id: Uuid, page: &str) -> AppResult<Layout> {
    let row = PageLayouts::find()
        .filter(LayoutCol::StoreId.eq(store_id))
        .filter(LayoutCol::Page.eq(page))
        .one(&state.orm)
        .await?;
    Ok(row
        .map(|r| builder::layout_from_json(&r.components))
        .unwrap_or_default())
}

pub async fn persist_layout<C: ConnectionTrait>(
    conn: &C,
    store_id: Uuid,
    page: &str,
    layout: &Layout,
) -> AppResult<()> {
    builder::validate(layout)?;
    let components = serde_json::to_value(layout)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;

    let row = page_layouts::ActiveModel {
        id: Set(Uuid::new_v4()),
        store_id: Set(store_id),
        page: Set(page.to_string()),
        components: Set(components),
        updated_at: Set(Utc::now().into()),
    };
    PageLayouts::insert(row)
        .on_conflict(
            OnConflict::columns([LayoutCol::StoreId, LayoutCol::Page])
                .update_columns([LayoutCol::Components, LayoutCol::UpdatedAt])
                .to_owned(),
        )
        .exec(conn)
        .await?;

    tracing::debug!(%store_id, page, components = layout.len(), "layout saved");
    Ok(())
}

fn layout_response(store_id: Uuid, page: String, components: Layout) -> PageLayoutResponse {
    PageLayoutResponse {
        store_id,
        page,
        components,
    }
}

pub async fn get_layout(
    state: &AppState,
    user: &AuthUser,
    store_id: Uuid,
    page: &str,
) -> AppResult<ApiResponse<PageLayoutResponse>> {
    let store = store_service::owned_store(state, user, store_id).await?;
    let page = validate_page(page)?;
    let layout = load_layout(state, store.id, &page).await?;
    Ok(ApiResponse::success(
        "Layout",
        layout_response(store.id, page, layout),
        None,
    ))
}

pub async fn save_layout(
    state: &AppState,
    user: &AuthUser,
    store_id: Uuid,
    page: &str,
    payload: SaveLayoutRequest,
) -> AppResult<ApiResponse<PageLayoutResponse>> {
    let store = store_service::owned_store(state, user, store_id).await?;
    let page = validate_page(page)?;
    persist_layout(&state.orm, store.id, &page, &payload.components).await?;

    audit::record(
        &state.orm,
        Some(user.user_id),
        "layout_save",
        "page_layouts",
        serde_json::json!({ "store_id": store.id, "page": page }),
    )
    .await;

    Ok(ApiResponse::success(
        "Layout saved",
        layout_response(store.id, page, payload.components),
        Some(Meta::empty()),
    ))
}

/// Load, mutate and save a page's layout in one call.
async fn edit_layout<F>(
    state: &AppState,
    user: &AuthUser,
    store_id: Uuid,
    page: &str,
    edit: F,
) -> AppResult<PageLayoutResponse>
where
    F: FnOnce(&mut Layout) -> AppResult<()>,
{
    let store = store_service::owned_store(state, user, store_id).await?;
    let page = validate_page(page)?;
    let mut layout = load_layout(state, store.id, &page).await?;
    edit(&mut layout)?;
    persist_layout(&state.orm, store.id, &page, &layout).await?;
    Ok(layout_response(store.id, page, layout))
}

pub async fn add_component(
    state: &AppState,
    user: &AuthUser,
    store_id: Uuid,
    page: &str,
    payload: AddComponentRequest,
) -> AppResult<ApiResponse<PageLayoutResponse>> {
    let resp = edit_layout(state, user, store_id, page, |layout| {
        builder::add(layout, &payload.kind, payload.props, payload.position)?;
        Ok(())
    })
    .await?;
    Ok(ApiResponse::success("Component added", resp, Some(Meta::empty())))
}

pub async fn move_component(
    state: &AppState,
    user: &AuthUser,
    store_id: Uuid,
    page: &str,
    payload: MoveComponentRequest,
) -> AppResult<ApiResponse<PageLayoutResponse>> {
    let resp = edit_layout(state, user, store_id, page, |layout| {
        builder::move_component(layout, payload.from, payload.to)?;
        Ok(())
    })
    .await?;
    Ok(ApiResponse::success("Component moved", resp, Some(Meta::empty())))
}

pub async fn update_component(
    state: &AppState,
    user: &AuthUser,
    store_id: Uuid,
    page: &str,
    component_id: &str,
    payload: UpdateComponentRequest,
) -> AppResult<ApiResponse<PageLayoutResponse>> {
    let resp = edit_layout(state, user, store_id, page, |layout| {
        builder::update_props(layout, component_id, payload.props)?;
        Ok(())
    })
    .await?;
    Ok(ApiResponse::success("Component updated", resp, Some(Meta::empty())))
}

pub async fn remove_component(
    state: &AppState,
    user: &AuthUser,
    store_id: Uuid,
    page: &str,
    component_id: &str,
) -> AppResult<ApiResponse<BuilderComponent>> {
    let mut removed = None;
    edit_layout(state, user, store_id, page, |layout| {
        removed = Some(builder::remove(layout, component_id)?);
        Ok(())
    })
    .await?;
    let removed = removed.ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Component removed", removed, Some(Meta::empty())))
}

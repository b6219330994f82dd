use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    audit,
    dto::stores::DeploymentList,
    entity::{
        deployments::{self, Column as DeployCol, Entity as Deployments},
        products::{Column as ProdCol, Entity as Products},
        stores::{self, Model as StoreModel},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Deployment, Store},
    response::{ApiResponse, Meta},
    services::store_service,
    state::AppState,
    templates,
};

pub fn storefront_url(subdomain: &str, base_domain: &str) -> String {
    format!("https://{subdomain}.{}", base_domain.trim_matches('.'))
}

/// Log lines recorded for a publish run.
pub fn deployment_logs(store: &StoreModel, url: &str, active_products: u64) -> Vec<String> {
    let template = templates::resolve(&store.template_id);
    let mut logs = vec![
        format!("Building storefront '{}' with template '{}'", store.name, template.id),
        format!("Bundling {active_products} active products"),
    ];
    if active_products == 0 {
        logs.push("WARNING: store has no active products".to_string());
    }
    logs.push(format!("Published to {url}"));
    logs
}

pub async fn publish(
    state: &AppState,
    user: &AuthUser,
    store_id: Uuid,
) -> AppResult<ApiResponse<Deployment>> {
    let store = store_service::owned_store(state, user, store_id).await?;
    let active_products = Products::find()
        .filter(ProdCol::StoreId.eq(store.id))
        .filter(ProdCol::IsActive.eq(true))
        .count(&state.orm)
        .await?;

    let url = storefront_url(&store.subdomain, &state.config.storefront_base_domain);
    let logs = deployment_logs(&store, &url, active_products);
    if active_products == 0 {
        tracing::warn!(store_id = %store.id, "publishing store without active products");
    }

    let deployment_id = Uuid::new_v4();
    let txn = state.orm.begin().await?;
    let deployment = deployments::ActiveModel {
        id: Set(deployment_id),
        store_id: Set(store.id),
        url: Set(url),
        external_id: Set(Some(format!("dpl_{}", deployment_id.simple()))),
        status: Set("success".into()),
        logs: Set(json!(logs)),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut active: stores::ActiveModel = store.into();
    active.is_published = Set(true);
    active.updated_at = Set(Utc::now().into());
    active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(%store_id, url = %deployment.url, "store published");
    audit::record(
        &state.orm,
        Some(user.user_id),
        "store_publish",
        "deployments",
        json!({ "store_id": store_id, "deployment_id": deployment.id }),
    )
    .await;

    Ok(ApiResponse::success("Store published", deployment.into(), Some(Meta::empty())))
}

pub async fn unpublish(
    state: &AppState,
    user: &AuthUser,
    store_id: Uuid,
) -> AppResult<ApiResponse<Store>> {
    let store = store_service::owned_store(state, user, store_id).await?;
    let mut active: stores::ActiveModel = store.into();
    active.is_published = Set(false);
    active.updated_at = Set(Utc::now().into());
    let store = active.update(&state.orm).await?;

    tracing::info!(%store_id, "store unpublished");
    audit::record(
        &state.orm,
        Some(user.user_id),
        "store_unpublish",
        "stores",
        json!({ "store_id": store_id }),
    )
    .await;

    Ok(ApiResponse::success("Store unpublished", store.into(), Some(Meta::empty())))
}

pub async fn list_deployments(
    state: &AppState,
    user: &AuthUser,
    store_id: Uuid,
) -> AppResult<ApiResponse<DeploymentList>> {
    let store = store_service::owned_store(state, user, store_id).await?;
    let items: Vec<Deployment> = Deployments::find()
        .filter(DeployCol::StoreId.eq(store.id))
        .order_by_desc(DeployCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Deployment::from)
        .collect();
    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Deployments",
        DeploymentList { items },
        Some(Meta::new(1, total, total)),
    ))
}

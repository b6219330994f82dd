use store_builder_api::{
    config::AppConfig,
    db::create_pool,
    dto::stores::CreateStoreRequest,
    middleware::auth::{AuthUser, Role},
    services::{auth_service::hash_password, product_service, store_service},
    state::AppState,
    templates::DEFAULT_TEMPLATE_ID,
};
use uuid::Uuid;

const DEMO_SUBDOMAIN: &str = "demo";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,store_builder_api=debug".into()),
        )
        .init();

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    let state = AppState::new(pool, config)?;

    let admin_id = ensure_user(&state, "admin@example.com", "admin12345", "Admin", Role::SuperAdmin).await?;
    let user_id = ensure_user(&state, "demo@example.com", "demo12345", "Demo Merchant", Role::User).await?;
    let store_id = ensure_demo_store(&state, user_id).await?;

    tracing::info!(%admin_id, %user_id, %store_id, "seed completed");
    Ok(())
}

async fn ensure_user(
    state: &AppState,
    email: &str,
    password: &str,
    name: &str,
    role: Role,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let (user_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, name, role)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(name)
    .bind(role.as_str())
    .fetch_one(&state.pool)
    .await?;

    tracing::info!(email, role = %role, "ensured user");
    Ok(user_id)
}

/// Demo store on the default template; re-running only tops up missing sample products.
async fn ensure_demo_store(state: &AppState, user_id: Uuid) -> anyhow::Result<Uuid> {
    let owner = AuthUser {
        user_id,
        role: Role::User,
    };

    match store_service::find_by_subdomain(state, DEMO_SUBDOMAIN).await {
        Ok(store) => {
            let summary = product_service::seed_store(&state.orm, &store)
                .await
                .map_err(|e| anyhow::anyhow!(e.to_string()))?;
            tracing::info!(store_id = %store.id, created = summary.created, "demo store already present");
            Ok(store.id)
        }
        Err(_) => {
            let resp = store_service::init_store(
                state,
                &owner,
                CreateStoreRequest {
                    name: "Demo Store".into(),
                    subdomain: DEMO_SUBDOMAIN.into(),
                    template_id: Some(DEFAULT_TEMPLATE_ID.into()),
                    settings: None,
                },
            )
            .await
            .map_err(|e| anyhow::anyhow!(e.to_string()))?;
            let init = resp
                .data
                .ok_or_else(|| anyhow::anyhow!("store init returned no data"))?;
            tracing::info!(store_id = %init.store.id, products = init.seeded_products, "demo store created");
            Ok(init.store.id)
        }
    }
}

use rust_decimal::Decimal;
use sea_orm::EntityTrait;
use secrecy::SecretString;
use serde_json::json;
use store_builder_api::{
    config::{AppConfig, StripeConfig},
    db::{create_pool, orm_from_pool, run_migrations},
    dto::{
        api_keys::UpsertApiKeyRequest,
        auth::RegisterRequest,
        builder::{AddComponentRequest, MoveComponentRequest},
        orders::{CartItemRequest, CheckoutRequest, CustomerInfo, QuoteRequest, UpdateOrderStatusRequest},
        products::{AmazonImportRequest, AmazonListing, DuplicateCheckRequest, DuplicateStrategy},
        stores::{CreateStoreRequest, StoreListQuery},
    },
    entity::products::Entity as Products,
    error::AppError,
    middleware::auth::{AuthUser, Role},
    models::Order,
    payments::sign,
    routes::params::{OrderListQuery, ProductQuery},
    services::{
        api_key_service, auth_service, builder_service, deployment_service, order_service,
        payment_service, product_service, store_service, storefront_service,
    },
    state::AppState,
};
use uuid::Uuid;

async fn setup_state() -> anyhow::Result<Option<AppState>> {
    setup_state_with(|_| {}).await
}

async fn setup_state_with(
    configure: impl FnOnce(&mut AppConfig),
) -> anyhow::Result<Option<AppState>> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run store flow tests.");
            return Ok(None);
        }
    };
    let pool = create_pool(&database_url).await?;
    run_migrations(&orm_from_pool(&pool)).await?;
    let mut config = AppConfig::for_tests(&database_url);
    configure(&mut config);
    Ok(Some(AppState::new(pool, config)?))
}

async fn register(state: &AppState, label: &str) -> anyhow::Result<AuthUser> {
    let resp = auth_service::register_user(
        state,
        RegisterRequest {
            email: format!("{label}-{}@example.com", Uuid::new_v4().simple()),
            password: "password123".into(),
            name: label.into(),
        },
    )
    .await?;
    let user = resp.data.ok_or_else(|| anyhow::anyhow!("no user"))?;
    Ok(AuthUser {
        user_id: user.id,
        role: Role::User,
    })
}

fn unique_subdomain(prefix: &str) -> String {
    format!("{prefix}-{}", &Uuid::new_v4().simple().to_string()[..8])
}

// Merchant builds a store, publishes it and a shopper checks out against it.
#[tokio::test]
async fn init_publish_and_checkout_flow() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let merchant = register(&state, "merchant").await?;
    let stranger = register(&state, "stranger").await?;
    let subdomain = unique_subdomain("flow");

    let init = store_service::init_store(
        &state,
        &merchant,
        CreateStoreRequest {
            name: "Flow Shop".into(),
            subdomain: subdomain.clone(),
            template_id: None,
            settings: None,
        },
    )
    .await?
    .data
    .ok_or_else(|| anyhow::anyhow!("no init data"))?;
    assert_eq!(init.store.template_id, "modern");
    assert!(init.seeded_products > 0);
    assert!(!init.layout.is_empty());

    // Taken subdomains and foreign owners are rejected.
    let taken = store_service::create_store(
        &state,
        &stranger,
        CreateStoreRequest {
            name: "Copy".into(),
            subdomain: subdomain.clone(),
            template_id: None,
            settings: None,
        },
    )
    .await;
    assert!(matches!(taken, Err(AppError::BadRequest(_))));
    assert!(matches!(
        store_service::get_store(&state, &stranger, init.store.id).await,
        Err(AppError::Forbidden)
    ));

    // Unpublished storefronts are hidden from the public but visible to the owner.
    assert!(matches!(
        storefront_service::get_storefront(&state, None, &subdomain).await,
        Err(AppError::NotFound)
    ));
    assert!(storefront_service::get_storefront(&state, Some(&merchant), &subdomain).await.is_ok());

    let deployment = deployment_service::publish(&state, &merchant, init.store.id)
        .await?
        .data
        .ok_or_else(|| anyhow::anyhow!("no deployment"))?;
    assert_eq!(deployment.status, "success");
    assert_eq!(deployment.url, format!("https://{subdomain}.shops.test"));
    assert!(!deployment.logs.iter().any(|l| l.starts_with("WARNING")));

    let view = storefront_service::get_storefront(&state, None, &subdomain)
        .await?
        .data
        .ok_or_else(|| anyhow::anyhow!("no storefront"))?;
    assert_eq!(view.theme.id, "modern");
    assert!(view.pages.iter().any(|p| p == "home"));
    assert_eq!(view.layout.len(), init.layout.len());
    let product = view.products.first().cloned().ok_or_else(|| anyhow::anyhow!("no products"))?;

    let quote = order_service::quote_cart(
        &state,
        &subdomain,
        QuoteRequest {
            items: vec![
                CartItemRequest { product_id: product.id, quantity: 1 },
                CartItemRequest { product_id: product.id, quantity: 1 },
            ],
        },
    )
    .await?
    .data
    .ok_or_else(|| anyhow::anyhow!("no quote"))?;
    assert_eq!(quote.lines.len(), 1);
    assert_eq!(quote.lines[0].quantity, 2);
    assert_eq!(quote.totals.subtotal, product.price * Decimal::from(2));

    let checkout = order_service::checkout(
        &state,
        &subdomain,
        CheckoutRequest {
            customer: CustomerInfo {
                name: "Shopper".into(),
                email: "Shopper@Example.com".into(),
                phone: None,
            },
            shipping_address: json!({ "line1": "1 Main St", "city": "Springfield" }),
            payment_method: "card".into(),
            items: vec![CartItemRequest { product_id: product.id, quantity: 2 }],
        },
    )
    .await?
    .data
    .ok_or_else(|| anyhow::anyhow!("no checkout"))?;
    assert_eq!(checkout.order.status, "pending");
    assert_eq!(checkout.order.payment_status, "unpaid");
    assert_eq!(checkout.order.customer_email, "shopper@example.com");
    assert_eq!(checkout.confirmation.total, quote.totals.total);
    assert_eq!(checkout.order.metadata["subtotal"], json!(quote.totals.subtotal));

    let reloaded = product_service::get_product(&state, None, product.id)
        .await?
        .data
        .ok_or_else(|| anyhow::anyhow!("no product"))?;
    assert_eq!(reloaded.stock_quantity, product.stock_quantity - 2);

    let too_many = order_service::checkout(
        &state,
        &subdomain,
        CheckoutRequest {
            customer: CustomerInfo {
                name: "Shopper".into(),
                email: "shopper@example.com".into(),
                phone: None,
            },
            shipping_address: json!({}),
            payment_method: "card".into(),
            items: vec![CartItemRequest { product_id: product.id, quantity: 1_000_000 }],
        },
    )
    .await;
    assert!(matches!(too_many, Err(AppError::BadRequest(_))));

    let orders = order_service::list_store_orders(&state, &merchant, init.store.id, OrderListQuery::default())
        .await?;
    assert_eq!(orders.meta.and_then(|m| m.total), Some(1));

    assert!(matches!(
        order_service::update_order_status(
            &state,
            &merchant,
            checkout.order.id,
            UpdateOrderStatusRequest { status: "teleported".into() },
        )
        .await,
        Err(AppError::BadRequest(_))
    ));
    let shipped = order_service::update_order_status(
        &state,
        &merchant,
        checkout.order.id,
        UpdateOrderStatusRequest { status: "shipped".into() },
    )
    .await?
    .data
    .ok_or_else(|| anyhow::anyhow!("no order"))?;
    assert_eq!(shipped.status, "shipped");
    assert!(matches!(
        order_service::get_order(&state, &stranger, checkout.order.id).await,
        Err(AppError::Forbidden)
    ));

    deployment_service::unpublish(&state, &merchant, init.store.id).await?;
    assert!(matches!(
        storefront_service::get_storefront(&state, None, &subdomain).await,
        Err(AppError::NotFound)
    ));
    let deployments = deployment_service::list_deployments(&state, &merchant, init.store.id)
        .await?
        .data
        .ok_or_else(|| anyhow::anyhow!("no deployments"))?;
    assert_eq!(deployments.items.len(), 1);

    Ok(())
}

#[tokio::test]
async fn amazon_import_deduplicates_per_store() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let merchant = register(&state, "importer").await?;
    let store = store_service::create_store(
        &state,
        &merchant,
        CreateStoreRequest {
            name: "Import Shop".into(),
            subdomain: unique_subdomain("import"),
            template_id: Some("techhub".into()),
            settings: None,
        },
    )
    .await?
    .data
    .ok_or_else(|| anyhow::anyhow!("no store"))?;

    let listing = |title: &str, price: i64| AmazonListing {
        asin: format!("B0{}", price),
        title: title.into(),
        price: Decimal::new(price, 2),
        images: vec![],
        url: format!("https://www.amazon.com/dp/B0{price}"),
        description: None,
        category: Some("audio".into()),
    };

    let first = product_service::import_amazon(
        &state,
        &merchant,
        store.id,
        AmazonImportRequest {
            on_duplicate: DuplicateStrategy::Skip,
            items: vec![listing("Studio Headphones", 9900), listing("Bookshelf Speakers", 14900)],
        },
    )
    .await?
    .data
    .ok_or_else(|| anyhow::anyhow!("no summary"))?;
    assert_eq!(first.created.len(), 2);

    let skipped = product_service::import_amazon(
        &state,
        &merchant,
        store.id,
        AmazonImportRequest {
            on_duplicate: DuplicateStrategy::Skip,
            items: vec![listing("  studio headphones ", 8900)],
        },
    )
    .await?
    .data
    .ok_or_else(|| anyhow::anyhow!("no summary"))?;
    assert!(skipped.created.is_empty());
    assert_eq!(skipped.skipped, vec![first.created[0]]);

    let updated = product_service::import_amazon(
        &state,
        &merchant,
        store.id,
        AmazonImportRequest {
            on_duplicate: DuplicateStrategy::Update,
            items: vec![listing("STUDIO HEADPHONES", 8900)],
        },
    )
    .await?
    .data
    .ok_or_else(|| anyhow::anyhow!("no summary"))?;
    assert_eq!(updated.updated, vec![first.created[0]]);

    let check = product_service::check_duplicate(
        &state,
        &merchant,
        store.id,
        DuplicateCheckRequest {
            name: "Bookshelf Speakers".into(),
            source: "amazon".into(),
        },
    )
    .await?
    .data
    .ok_or_else(|| anyhow::anyhow!("no check"))?;
    assert!(check.exists);
    assert_eq!(check.product_id, Some(first.created[1]));

    let manual = product_service::check_duplicate(
        &state,
        &merchant,
        store.id,
        DuplicateCheckRequest {
            name: "Bookshelf Speakers".into(),
            source: "manual".into(),
        },
    )
    .await?
    .data
    .ok_or_else(|| anyhow::anyhow!("no check"))?;
    assert!(!manual.exists);

    let listed = product_service::list_products(&state, Some(&merchant), store.id, ProductQuery::default())
        .await?;
    assert_eq!(listed.meta.and_then(|m| m.total), Some(2));

    Ok(())
}

#[tokio::test]
async fn builder_and_api_keys_flow() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let merchant = register(&state, "builder").await?;
    let store = store_service::create_store(
        &state,
        &merchant,
        CreateStoreRequest {
            name: "Builder Shop".into(),
            subdomain: unique_subdomain("build"),
            template_id: Some("luxe".into()),
            settings: Some(json!({ "tax_rate": "0.2" })),
        },
    )
    .await?
    .data
    .ok_or_else(|| anyhow::anyhow!("no store"))?;

    let empty = builder_service::get_layout(&state, &merchant, store.id, "about").await?;
    assert!(empty.data.is_some_and(|l| l.components.is_empty()));

    for kind in ["header", "text_block", "footer"] {
        builder_service::add_component(
            &state,
            &merchant,
            store.id,
            "about",
            AddComponentRequest { kind: kind.into(), props: None, position: None },
        )
        .await?;
    }
    let moved = builder_service::move_component(
        &state,
        &merchant,
        store.id,
        "about",
        MoveComponentRequest { from: 2, to: 0 },
    )
    .await?
    .data
    .ok_or_else(|| anyhow::anyhow!("no layout"))?;
    let kinds: Vec<&str> = moved.components.iter().map(|c| c.kind.as_str()).collect();
    assert_eq!(kinds, ["footer", "header", "text_block"]);

    let removed = builder_service::remove_component(&state, &merchant, store.id, "about", &moved.components[0].id)
        .await?
        .data
        .ok_or_else(|| anyhow::anyhow!("no component"))?;
    assert_eq!(removed.kind, "footer");
    assert!(matches!(
        builder_service::remove_component(&state, &merchant, store.id, "about", &removed.id).await,
        Err(AppError::NotFound)
    ));

    let saved = api_key_service::upsert_key(
        &state,
        &merchant,
        "stripe",
        UpsertApiKeyRequest {
            credentials: json!({ "secret_key": "sk_test_abcdef123456" }),
        },
    )
    .await?
    .data
    .ok_or_else(|| anyhow::anyhow!("no key"))?;
    assert_eq!(saved.credentials["secret_key"], "****3456");

    api_key_service::upsert_key(
        &state,
        &merchant,
        "stripe",
        UpsertApiKeyRequest {
            credentials: json!({ "secret_key": "sk_test_rotated9999" }),
        },
    )
    .await?;
    let keys = api_key_service::list_keys(&state, &merchant)
        .await?
        .data
        .ok_or_else(|| anyhow::anyhow!("no keys"))?;
    assert_eq!(keys.items.len(), 1);
    assert_eq!(keys.items[0].credentials["secret_key"], "****9999");

    api_key_service::delete_key(&state, &merchant, "stripe").await?;
    assert!(matches!(
        api_key_service::delete_key(&state, &merchant, "stripe").await,
        Err(AppError::NotFound)
    ));

    let published = deployment_service::publish(&state, &merchant, store.id)
        .await?
        .data
        .ok_or_else(|| anyhow::anyhow!("no deployment"))?;
    assert!(published.logs.iter().any(|l| l.starts_with("WARNING")));

    Ok(())
}

fn store_request(name: &str, subdomain: &str) -> CreateStoreRequest {
    CreateStoreRequest {
        name: name.into(),
        subdomain: subdomain.into(),
        template_id: None,
        settings: None,
    }
}

#[tokio::test]
async fn concurrent_creates_on_one_subdomain_leave_a_single_store() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let first = register(&state, "racer-a").await?;
    let second = register(&state, "racer-b").await?;
    let subdomain = unique_subdomain("race");

    let (a, b) = tokio::join!(
        store_service::init_store(&state, &first, store_request("Race A", &subdomain)),
        store_service::init_store(&state, &second, store_request("Race B", &subdomain)),
    );
    let results = [a.map(|_| ()), b.map(|_| ())];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        results
            .iter()
            .any(|r| matches!(r, Err(AppError::BadRequest(msg)) if msg.contains("taken")))
    );

    // The losing init left nothing behind for its owner.
    let mut owned = 0;
    for user in [&first, &second] {
        owned += store_service::list_stores(&state, user, StoreListQuery { all: None })
            .await?
            .data
            .map_or(0, |l| l.items.len());
    }
    assert_eq!(owned, 1);

    Ok(())
}

#[tokio::test]
async fn soft_deleted_products_leave_public_listings() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let merchant = register(&state, "pruner").await?;
    let subdomain = unique_subdomain("prune");
    let init = store_service::init_store(&state, &merchant, store_request("Prune Shop", &subdomain))
        .await?
        .data
        .ok_or_else(|| anyhow::anyhow!("no init data"))?;
    deployment_service::publish(&state, &merchant, init.store.id).await?;

    let before = product_service::active_products(&state, init.store.id).await?;
    let victim = before.first().cloned().ok_or_else(|| anyhow::anyhow!("no products"))?;

    product_service::delete_product(&state, &merchant, victim.id).await?;

    let row = Products::find_by_id(victim.id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| anyhow::anyhow!("row removed"))?;
    assert!(!row.is_active);

    let after = product_service::active_products(&state, init.store.id).await?;
    assert_eq!(after.len(), before.len() - 1);
    assert!(after.iter().all(|p| p.id != victim.id));

    let public = product_service::list_products(&state, None, init.store.id, ProductQuery::default())
        .await?
        .data
        .ok_or_else(|| anyhow::anyhow!("no list"))?;
    assert!(public.items.iter().all(|p| p.id != victim.id));
    assert!(matches!(
        product_service::get_product(&state, None, victim.id).await,
        Err(AppError::NotFound)
    ));

    // Only the owner sees inactive rows, and only when asking for them.
    let with_inactive = || ProductQuery {
        include_inactive: Some(true),
        per_page: Some(100),
        ..Default::default()
    };
    let owner_view = product_service::list_products(&state, Some(&merchant), init.store.id, with_inactive())
        .await?
        .data
        .ok_or_else(|| anyhow::anyhow!("no list"))?;
    assert!(owner_view.items.iter().any(|p| p.id == victim.id && !p.is_active));
    let anonymous = product_service::list_products(&state, None, init.store.id, with_inactive())
        .await?
        .data
        .ok_or_else(|| anyhow::anyhow!("no list"))?;
    assert!(anonymous.items.iter().all(|p| p.id != victim.id));

    Ok(())
}

const WEBHOOK_SECRET: &str = "whsec_flow";

fn signed_event(event_type: &str, order_id: Uuid) -> anyhow::Result<(String, String)> {
    let payload = json!({
        "id": format!("evt_{}", Uuid::new_v4().simple()),
        "type": event_type,
        "data": {
            "object": {
                "id": "pi_flow",
                "object": "payment_intent",
                "metadata": { "order_id": order_id.to_string() }
            }
        }
    })
    .to_string();
    let ts = chrono::Utc::now().timestamp();
    let header = format!("t={ts},v1={}", sign(WEBHOOK_SECRET, ts, &payload)?);
    Ok((payload, header))
}

async fn place_order(state: &AppState, merchant: &AuthUser) -> anyhow::Result<Order> {
    let subdomain = unique_subdomain("pay");
    let init = store_service::init_store(state, merchant, store_request("Pay Shop", &subdomain))
        .await?
        .data
        .ok_or_else(|| anyhow::anyhow!("no init data"))?;
    deployment_service::publish(state, merchant, init.store.id).await?;
    let product = product_service::active_products(state, init.store.id)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("no products"))?;

    let checkout = order_service::checkout(
        state,
        &subdomain,
        CheckoutRequest {
            customer: CustomerInfo {
                name: "Payer".into(),
                email: "payer@example.com".into(),
                phone: None,
            },
            shipping_address: json!({ "line1": "2 Side St" }),
            payment_method: "card".into(),
            items: vec![CartItemRequest { product_id: product.id, quantity: 1 }],
        },
    )
    .await?
    .data
    .ok_or_else(|| anyhow::anyhow!("no checkout"))?;
    Ok(checkout.order)
}

async fn reload_order(state: &AppState, merchant: &AuthUser, id: Uuid) -> anyhow::Result<Order> {
    order_service::get_order(state, merchant, id)
        .await?
        .data
        .ok_or_else(|| anyhow::anyhow!("no order"))
}

#[tokio::test]
async fn webhook_events_update_orders() -> anyhow::Result<()> {
    let Some(state) = setup_state_with(|config| {
        config.stripe = Some(StripeConfig {
            secret_key: SecretString::from("sk_test_flow".to_string()),
            webhook_secret: Some(SecretString::from(WEBHOOK_SECRET.to_string())),
            api_base: "http://127.0.0.1:9".to_string(),
            currency: "usd".to_string(),
        });
    })
    .await?
    else {
        return Ok(());
    };
    let merchant = register(&state, "payee").await?;

    // A failed attempt marks the payment but keeps the order pending.
    let order = place_order(&state, &merchant).await?;
    let (payload, header) = signed_event("payment_intent.payment_failed", order.id)?;
    let ack = payment_service::handle_webhook(&state, &payload, &header)
        .await?
        .data
        .ok_or_else(|| anyhow::anyhow!("no ack"))?;
    assert_eq!(ack.order_id, Some(order.id));
    let failed = reload_order(&state, &merchant, order.id).await?;
    assert_eq!(failed.status, "pending");
    assert_eq!(failed.payment_status, "failed");
    assert_eq!(failed.metadata["payment_intent_id"], "pi_flow");

    let (payload, header) = signed_event("payment_intent.succeeded", order.id)?;
    payment_service::handle_webhook(&state, &payload, &header).await?;
    let paid = reload_order(&state, &merchant, order.id).await?;
    assert_eq!(paid.status, "paid");
    assert_eq!(paid.payment_status, "paid");

    // Unknown orders and unhandled event types are acknowledged without changes.
    let (payload, header) = signed_event("payment_intent.succeeded", Uuid::new_v4())?;
    let ack = payment_service::handle_webhook(&state, &payload, &header)
        .await?
        .data
        .ok_or_else(|| anyhow::anyhow!("no ack"))?;
    assert!(ack.received);
    assert_eq!(ack.order_id, None);

    let (payload, header) = signed_event("charge.refunded", order.id)?;
    let ack = payment_service::handle_webhook(&state, &payload, &header)
        .await?
        .data
        .ok_or_else(|| anyhow::anyhow!("no ack"))?;
    assert_eq!(ack.order_id, None);
    assert_eq!(reload_order(&state, &merchant, order.id).await?.status, "paid");

    // A bad signature never reaches the order.
    let (payload, _) = signed_event("payment_intent.canceled", order.id)?;
    let forged = format!("t={},v1={}", chrono::Utc::now().timestamp(), "00".repeat(32));
    assert!(matches!(
        payment_service::handle_webhook(&state, &payload, &forged).await,
        Err(AppError::Payment(_))
    ));
    assert_eq!(reload_order(&state, &merchant, order.id).await?.payment_status, "paid");

    Ok(())
}

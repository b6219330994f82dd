use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::sea_query::{Expr, LockType};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
    audit,
    dto::orders::{
        CartItemRequest, CheckoutRequest, CheckoutResponse, OrderConfirmation, OrderList,
        QuoteRequest, QuoteResponse, UpdateOrderStatusRequest,
    },
    entity::{
        orders::{self, Column as OrderCol, Entity as Orders},
        products::{Column as ProdCol, Entity as Products, Model as ProductModel},
        stores::Model as StoreModel,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Order,
    pricing::{self, CartLine, CartTotals, PricingConfig},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::store_service,
    state::AppState,
};

pub const ORDER_STATUSES: [&str; 7] = [
    "pending",
    "paid",
    "processing",
    "shipped",
    "delivered",
    "cancelled",
    "refunded",
];

pub fn validate_order_status(status: &str) -> Result<(), AppError> {
    if ORDER_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(AppError::BadRequest("Invalid order status".into()))
    }
}

pub fn pricing_for(state: &AppState, store: &StoreModel) -> PricingConfig {
    PricingConfig::from_config(&state.config).with_overrides(&store.settings)
}

/// Merge repeated product ids, keeping first-seen order, and reject empty
/// carts or non-positive quantities.
pub fn normalize_cart(items: &[CartItemRequest]) -> AppResult<Vec<CartItemRequest>> {
    if items.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }
    let mut merged: Vec<CartItemRequest> = Vec::with_capacity(items.len());
    for item in items {
        if item.quantity <= 0 {
            return Err(AppError::BadRequest(
                "quantity must be greater than 0".into(),
            ));
        }
        match merged.iter_mut().find(|m| m.product_id == item.product_id) {
            Some(existing) => {
                existing.quantity = existing
                    .quantity
                    .checked_add(item.quantity)
                    .ok_or_else(|| AppError::BadRequest("quantity is too large".into()))?;
            }
            None => merged.push(item.clone()),
        }
    }
    Ok(merged)
}

async fn load_cart<C: ConnectionTrait>(
    conn: &C,
    store_id: Uuid,
    items: &[CartItemRequest],
    lock: bool,
) -> AppResult<Vec<(CartLine, ProductModel)>> {
    let ids: Vec<Uuid> = items.iter().map(|i| i.product_id).collect();
    let mut finder = Products::find().filter(
        Condition::all()
            .add(ProdCol::StoreId.eq(store_id))
            .add(ProdCol::IsActive.eq(true))
            .add(ProdCol::Id.is_in(ids)),
    );
    if lock {
        finder = finder.lock(LockType::Update);
    }
    let products = finder.all(conn).await?;

    items
        .iter()
        .map(|item| {
            let product = products
                .iter()
                .find(|p| p.id == item.product_id)
                .ok_or_else(|| {
                    AppError::BadRequest(format!("Product {} is not available", item.product_id))
                })?;
            let line = CartLine {
                product_id: product.id,
                name: product.name.clone(),
                unit_price: product.price,
                quantity: item.quantity,
            };
            Ok((line, product.clone()))
        })
        .collect()
}

fn items_snapshot(lines: &[CartLine]) -> Value {
    Value::Array(
        lines
            .iter()
            .map(|line| {
                json!({
                    "product_id": line.product_id,
                    "name": line.name,
                    "unit_price": line.unit_price,
                    "quantity": line.quantity,
                    "line_total": pricing::round_money(line.line_total()),
                })
            })
            .collect(),
    )
}

fn totals_metadata(totals: &CartTotals, template_id: &str) -> Value {
    json!({
        "subtotal": totals.subtotal,
        "shipping": totals.shipping,
        "tax": totals.tax,
        "item_count": totals.item_count,
        "template_id": template_id,
    })
}

async fn published_store(state: &AppState, subdomain: &str) -> AppResult<StoreModel> {
    let store = store_service::find_by_subdomain(state, subdomain).await?;
    if !store.is_published {
        return Err(AppError::NotFound);
    }
    Ok(store)
}

pub async fn quote_cart(
    state: &AppState,
    subdomain: &str,
    payload: QuoteRequest,
) -> AppResult<ApiResponse<QuoteResponse>> {
    let store = published_store(state, subdomain).await?;
    let items = normalize_cart(&payload.items)?;
    let lines: Vec<CartLine> = load_cart(&state.orm, store.id, &items, false)
        .await?
        .into_iter()
        .map(|(line, _)| line)
        .collect();
    let totals = pricing::quote(&lines, &pricing_for(state, &store));

    Ok(ApiResponse::success(
        "Quote",
        QuoteResponse { lines, totals },
        None,
    ))
}

fn validate_checkout(payload: &CheckoutRequest) -> AppResult<()> {
    if payload.customer.name.trim().is_empty() {
        return Err(AppError::BadRequest("Customer name is required".into()));
    }
    let email = payload.customer.email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
        _ => return Err(AppError::BadRequest("A valid customer email is required".into())),
    }
    if !payload.shipping_address.is_object() {
        return Err(AppError::BadRequest("shipping_address must be an object".into()));
    }
    if payload.payment_method.trim().is_empty() {
        return Err(AppError::BadRequest("payment_method is required".into()));
    }
    Ok(())
}

pub async fn checkout(
    state: &AppState,
    subdomain: &str,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<CheckoutResponse>> {
    let store = published_store(state, subdomain).await?;
    validate_checkout(&payload)?;
    let items = normalize_cart(&payload.items)?;
    let pricing_config = pricing_for(state, &store);

    let txn = state.orm.begin().await?;
    let cart = load_cart(&txn, store.id, &items, true).await?;

    for (line, product) in &cart {
        if product.stock_quantity < line.quantity {
            return Err(AppError::BadRequest(format!(
                "Insufficient stock for product {}",
                product.id
            )));
        }
    }

    let lines: Vec<CartLine> = cart.iter().map(|(line, _)| line.clone()).collect();
    let totals = pricing::quote(&lines, &pricing_config);

    for line in &lines {
        Products::update_many()
            .col_expr(
                ProdCol::StockQuantity,
                Expr::col(ProdCol::StockQuantity).sub(line.quantity),
            )
            .col_expr(ProdCol::UpdatedAt, Expr::current_timestamp().into())
            .filter(ProdCol::Id.eq(line.product_id))
            .exec(&txn)
            .await?;
    }

    let order = orders::ActiveModel {
        id: Set(Uuid::new_v4()),
        store_id: Set(store.id),
        customer_name: Set(payload.customer.name.trim().to_string()),
        customer_email: Set(payload.customer.email.trim().to_lowercase()),
        customer_phone: Set(payload
            .customer
            .phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())),
        shipping_address: Set(payload.shipping_address),
        total_amount: Set(totals.total),
        status: Set("pending".into()),
        payment_method: Set(payload.payment_method.trim().to_string()),
        payment_status: Set("unpaid".into()),
        items: Set(items_snapshot(&lines)),
        metadata: Set(totals_metadata(&totals, &store.template_id)),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    tracing::info!(order_id = %order.id, store_id = %store.id, total = %order.total_amount, "order placed");
    audit::record(
        &state.orm,
        None,
        "checkout",
        "orders",
        json!({ "order_id": order.id, "store_id": store.id }),
    )
    .await;

    let confirmation = OrderConfirmation {
        order_id: order.id,
        total: order.total_amount,
        status: order.status.clone(),
    };

    Ok(ApiResponse::success(
        "Checkout success",
        CheckoutResponse {
            order: order.into(),
            totals,
            confirmation,
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_store_orders(
    state: &AppState,
    user: &AuthUser,
    store_id: Uuid,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let store = store_service::owned_store(state, user, store_id).await?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all().add(OrderCol::StoreId.eq(store.id));
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }

    let mut finder = Orders::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Orders", OrderList { items: orders }, Some(meta)))
}

pub async fn get_order(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<ApiResponse<Order>> {
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    store_service::owned_store(state, user, order.store_id).await?;
    Ok(ApiResponse::success("Order", order.into(), Some(Meta::empty())))
}

pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    let status = payload.status.trim().to_lowercase();
    validate_order_status(&status)?;

    let existing = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    store_service::owned_store(state, user, existing.store_id).await?;

    let mut active: orders::ActiveModel = existing.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    audit::record(
        &state.orm,
        Some(user.user_id),
        "order_status_update",
        "orders",
        json!({ "order_id": order.id, "status": order.status }),
    )
    .await;

    Ok(ApiResponse::success("Order updated", order.into(), Some(Meta::empty())))
}

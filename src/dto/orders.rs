use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    models::Order,
    pricing::{CartLine, CartTotals},
};

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CartItemRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct QuoteRequest {
    pub items: Vec<CartItemRequest>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QuoteResponse {
    pub lines: Vec<CartLine>,
    pub totals: CartTotals,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub customer: CustomerInfo,
    pub shipping_address: Value,
    pub payment_method: String,
    pub items: Vec<CartItemRequest>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderConfirmation {
    pub order_id: Uuid,
    pub total: Decimal,
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub order: Order,
    pub totals: CartTotals,
    pub confirmation: OrderConfirmation,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct OrderList {
    #[schema(value_type = Vec<Order>)]
    pub items: Vec<Order>,
}

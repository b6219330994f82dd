//! Cart math shared by quotes and checkout.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PricingConfig {
    pub free_shipping_threshold: Decimal,
    pub shipping_rate: Decimal,
    pub tax_rate: Decimal,
}

impl PricingConfig {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            free_shipping_threshold: config.free_shipping_threshold,
            shipping_rate: config.shipping_rate,
            tax_rate: config.tax_rate,
        }
    }

    /// Apply per-store overrides from a store's `settings` blob.
    ///
    /// Keys mirror the field names; values may be JSON numbers or numeric
    /// strings. Negative or unparsable values are ignored.
    pub fn with_overrides(mut self, settings: &Value) -> Self {
        if let Some(v) = decimal_setting(settings, "free_shipping_threshold") {
            self.free_shipping_threshold = v;
        }
        if let Some(v) = decimal_setting(settings, "shipping_rate") {
            self.shipping_rate = v;
        }
        if let Some(v) = decimal_setting(settings, "tax_rate") {
            self.tax_rate = v;
        }
        self
    }
}

fn decimal_setting(settings: &Value, key: &str) -> Option<Decimal> {
    let parsed = match settings.get(key)? {
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }?;
    (!parsed.is_sign_negative()).then_some(parsed)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CartLine {
    pub product_id: Uuid,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
}

impl CartLine {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub item_count: i64,
}

pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn quote(lines: &[CartLine], config: &PricingConfig) -> CartTotals {
    let subtotal = round_money(lines.iter().map(CartLine::line_total).sum());
    let item_count = lines.iter().map(|l| i64::from(l.quantity)).sum();

    let shipping = if lines.is_empty() || subtotal >= config.free_shipping_threshold {
        Decimal::ZERO
    } else {
        round_money(config.shipping_rate)
    };
    let tax = round_money(subtotal * config.tax_rate);

    CartTotals {
        subtotal,
        shipping,
        tax,
        total: subtotal + shipping + tax,
        item_count,
    }
}

/// Amount in the currency's minor unit (cents), as payment providers expect.
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    use rust_decimal::prelude::ToPrimitive;
    (round_money(amount) * Decimal::ONE_HUNDRED).to_i64()
}

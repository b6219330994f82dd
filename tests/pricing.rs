use rust_decimal::Decimal;
use serde_json::json;
use store_builder_api::{
    config::AppConfig,
    pricing::{CartLine, PricingConfig, quote, to_minor_units},
};
use uuid::Uuid;

fn dec(s: &str) -> Decimal {
    s.parse().expect("decimal literal")
}

fn line(price: &str, quantity: i32) -> CartLine {
    CartLine {
        product_id: Uuid::new_v4(),
        name: "Item".into(),
        unit_price: dec(price),
        quantity,
    }
}

fn defaults() -> PricingConfig {
    PricingConfig::from_config(&AppConfig::for_tests("postgres://unused"))
}

#[test]
fn empty_cart_has_no_shipping_or_tax() {
    let totals = quote(&[], &defaults());
    assert_eq!(totals.subtotal, Decimal::ZERO);
    assert_eq!(totals.shipping, Decimal::ZERO);
    assert_eq!(totals.tax, Decimal::ZERO);
    assert_eq!(totals.total, Decimal::ZERO);
    assert_eq!(totals.item_count, 0);
}

#[test]
fn small_cart_pays_flat_shipping_and_tax() {
    let totals = quote(&[line("10.00", 2), line("4.99", 1)], &defaults());
    assert_eq!(totals.subtotal, dec("24.99"));
    assert_eq!(totals.shipping, dec("5.99"));
    // 24.99 * 0.08 = 1.9992
    assert_eq!(totals.tax, dec("2.00"));
    assert_eq!(totals.total, dec("32.98"));
    assert_eq!(totals.item_count, 3);
}

#[test]
fn shipping_is_free_at_the_threshold() {
    let totals = quote(&[line("25.00", 2)], &defaults());
    assert_eq!(totals.subtotal, dec("50.00"));
    assert_eq!(totals.shipping, Decimal::ZERO);
    assert_eq!(totals.tax, dec("4.00"));
    assert_eq!(totals.total, dec("54.00"));
}

#[test]
fn store_settings_override_defaults() {
    let config = defaults().with_overrides(&json!({
        "free_shipping_threshold": "100",
        "shipping_rate": 9.5,
        "tax_rate": "0.2",
        "unrelated": true
    }));
    assert_eq!(config.free_shipping_threshold, dec("100"));
    assert_eq!(config.shipping_rate, dec("9.5"));
    assert_eq!(config.tax_rate, dec("0.2"));

    let totals = quote(&[line("60.00", 1)], &config);
    assert_eq!(totals.shipping, dec("9.50"));
    assert_eq!(totals.tax, dec("12.00"));
    assert_eq!(totals.total, dec("81.50"));
}

#[test]
fn invalid_overrides_are_ignored() {
    let config = defaults().with_overrides(&json!({
        "shipping_rate": -1,
        "tax_rate": "lots",
        "free_shipping_threshold": null
    }));
    assert_eq!(config, defaults());
}

#[test]
fn minor_units_round_to_cents() {
    assert_eq!(to_minor_units(dec("32.98")), Some(3298));
    assert_eq!(to_minor_units(dec("0.005")), Some(1));
    assert_eq!(to_minor_units(Decimal::ZERO), Some(0));
}

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use store_builder_api::{
    catalog::{self, AMAZON_SOURCE},
    dto::products::AmazonListing,
    entity::products,
};
use uuid::Uuid;

fn product(name: &str, metadata: Value, age_minutes: i64) -> products::Model {
    let created = (Utc::now() - Duration::minutes(age_minutes)).fixed_offset();
    products::Model {
        id: Uuid::new_v4(),
        store_id: Uuid::new_v4(),
        name: name.to_string(),
        description: None,
        price: Decimal::new(1000, 2),
        images: json!([]),
        sku: None,
        stock_quantity: 1,
        is_active: true,
        metadata,
        created_at: created,
        updated_at: created,
    }
}

#[test]
fn names_and_sources_compare_trimmed_and_case_insensitive() {
    let item = product("  Ceramic Mug ", json!({ "source": "Amazon" }), 0);
    assert!(catalog::is_duplicate(&item, "ceramic mug", "amazon"));
    assert!(catalog::is_duplicate(&item, "CERAMIC MUG", " AMAZON "));
    assert!(!catalog::is_duplicate(&item, "ceramic mug", "manual"));
    assert!(!catalog::is_duplicate(&item, "ceramic mugs", "amazon"));
}

#[test]
fn missing_source_only_matches_empty_source() {
    let item = product("Notebook", json!({}), 0);
    assert_eq!(catalog::product_source(&item.metadata), "");
    assert!(catalog::is_duplicate(&item, "notebook", ""));
    assert!(!catalog::is_duplicate(&item, "notebook", "manual"));

    let odd = product("Notebook", json!({ "source": 42 }), 0);
    assert_eq!(catalog::product_source(&odd.metadata), "");
}

#[test]
fn first_match_in_order_wins() {
    let older = product("Tote", json!({ "source": "manual" }), 10);
    let newer = product("tote", json!({ "source": "manual" }), 1);
    let other = product("Tote", json!({ "source": "amazon" }), 5);
    let products = vec![older.clone(), other.clone(), newer];

    let found = catalog::find_duplicate(&products, "TOTE", "manual").expect("match");
    assert_eq!(found.id, older.id);

    let found = catalog::find_duplicate(&products, "tote", AMAZON_SOURCE).expect("match");
    assert_eq!(found.id, other.id);

    assert!(catalog::find_duplicate(&products, "bag", "manual").is_none());
}

#[test]
fn amazon_listing_maps_to_product_input() {
    let input = catalog::from_amazon(AmazonListing {
        asin: "B0TEST1234".into(),
        title: "Wireless Mouse".into(),
        price: Decimal::new(2599, 2),
        images: vec!["https://images.example/mouse.jpg".into()],
        url: "https://www.amazon.com/dp/B0TEST1234".into(),
        description: Some("Quiet clicks".into()),
        category: Some("peripherals".into()),
    });

    assert_eq!(input.name, "Wireless Mouse");
    assert_eq!(input.sku.as_deref(), Some("B0TEST1234"));
    assert_eq!(input.price, Decimal::new(2599, 2));

    let metadata = catalog::import_metadata(&input, AMAZON_SOURCE);
    assert_eq!(metadata["source"], "amazon");
    assert_eq!(metadata["asin"], "B0TEST1234");
    assert_eq!(metadata["source_url"], "https://www.amazon.com/dp/B0TEST1234");
    assert_eq!(metadata["category"], "peripherals");
    assert_eq!(metadata["status"], "published");
}

#[test]
fn sample_catalog_falls_back_to_general() {
    let fashion = catalog::sample_products("fashion");
    assert!(fashion.iter().any(|s| s.name == "Denim Jacket"));
    assert_eq!(
        catalog::sample_products("unheard-of").len(),
        catalog::sample_products("general").len()
    );

    let input = fashion[0].to_input();
    assert_eq!(input.price, Decimal::new(fashion[0].price, 2));
    assert_eq!(input.images.len(), 1);
    assert_eq!(input.category.as_deref(), Some(fashion[0].category));
}

//! Product import helpers: duplicate matching, Amazon listing mapping and the
//! sample catalog used to seed new stores.

use rust_decimal::Decimal;
use serde_json::{Value, json};

use crate::{
    dto::products::{AmazonListing, ProductInput},
    entity::products,
};

pub const AMAZON_SOURCE: &str = "amazon";

pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// The `source` recorded in a product's metadata, normalised; missing reads as "".
pub fn product_source(metadata: &Value) -> String {
    metadata
        .get("source")
        .and_then(Value::as_str)
        .map(normalize_name)
        .unwrap_or_default()
}

pub fn is_duplicate(product: &products::Model, name: &str, source: &str) -> bool {
    normalize_name(&product.name) == normalize_name(name)
        && product_source(&product.metadata) == normalize_name(source)
}

/// First product in `products` with the same name and source. Callers pass
/// one store's products in creation order.
pub fn find_duplicate<'a>(
    products: &'a [products::Model],
    name: &str,
    source: &str,
) -> Option<&'a products::Model> {
    products.iter().find(|p| is_duplicate(p, name, source))
}

/// Metadata blob for an imported product: caller-provided keys plus
/// `source`, `category` and the default `status`.
pub fn import_metadata(input: &ProductInput, source: &str) -> Value {
    let mut metadata = match &input.metadata {
        Some(Value::Object(map)) => map.clone(),
        _ => serde_json::Map::new(),
    };
    metadata.insert("source".into(), Value::String(source.trim().to_string()));
    if let Some(category) = input.category.as_ref().filter(|c| !c.trim().is_empty()) {
        metadata.insert("category".into(), Value::String(category.trim().to_string()));
    }
    metadata
        .entry("status")
        .or_insert_with(|| Value::String("published".into()));
    Value::Object(metadata)
}

pub fn from_amazon(listing: AmazonListing) -> ProductInput {
    ProductInput {
        name: listing.title,
        description: listing.description,
        price: listing.price,
        images: listing.images,
        sku: Some(listing.asin.clone()),
        stock_quantity: 0,
        category: listing.category,
        metadata: Some(json!({
            "asin": listing.asin,
            "source_url": listing.url,
        })),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SampleProduct {
    pub name: &'static str,
    pub description: &'static str,
    /// Price in cents.
    pub price: i64,
    pub stock: i32,
    pub category: &'static str,
}

impl SampleProduct {
    pub fn to_input(&self) -> ProductInput {
        ProductInput {
            name: self.name.to_string(),
            description: Some(self.description.to_string()),
            price: Decimal::new(self.price, 2),
            images: vec![format!(
                "https://placehold.co/600x600?text={}",
                self.name.replace(' ', "+")
            )],
            sku: None,
            stock_quantity: self.stock,
            category: Some(self.category.to_string()),
            metadata: None,
        }
    }
}

const fn sample(
    name: &'static str,
    description: &'static str,
    price: i64,
    stock: i32,
    category: &'static str,
) -> SampleProduct {
    SampleProduct {
        name,
        description,
        price,
        stock,
        category,
    }
}

const GENERAL: &[SampleProduct] = &[
    sample("Classic Tote Bag", "Sturdy canvas tote for everyday use", 2499, 40, "accessories"),
    sample("Ceramic Mug", "12oz stoneware mug, dishwasher safe", 1499, 60, "home"),
    sample("Notebook Set", "Three dotted notebooks with recycled paper", 1899, 50, "stationery"),
    sample("Water Bottle", "Insulated 750ml steel bottle", 2999, 35, "accessories"),
];

const FASHION: &[SampleProduct] = &[
    sample("Linen Shirt", "Breathable relaxed-fit linen shirt", 5900, 25, "tops"),
    sample("Denim Jacket", "Washed denim with a boxy cut", 8900, 15, "outerwear"),
    sample("Silk Scarf", "Hand-rolled silk scarf", 4500, 30, "accessories"),
    sample("Canvas Sneakers", "Low-top sneakers with rubber sole", 6900, 20, "shoes"),
];

const ELECTRONICS: &[SampleProduct] = &[
    sample("Wireless Earbuds", "Noise-cancelling earbuds with charging case", 12900, 30, "audio"),
    sample("USB-C Hub", "7-in-1 hub with HDMI and card reader", 4900, 45, "accessories"),
    sample("Mechanical Keyboard", "Hot-swappable 75% keyboard", 11900, 12, "peripherals"),
    sample("Smart Speaker", "Voice-controlled speaker with room-filling sound", 9900, 18, "audio"),
];

const FOOD: &[SampleProduct] = &[
    sample("Sourdough Loaf", "Naturally leavened country loaf", 800, 20, "bakery"),
    sample("Organic Honey", "Raw wildflower honey, 500g", 1200, 40, "pantry"),
    sample("Single-Origin Coffee", "Medium roast whole beans, 250g", 1600, 35, "drinks"),
    sample("Granola Jar", "Maple pecan granola, 400g", 950, 30, "breakfast"),
];

const BEAUTY: &[SampleProduct] = &[
    sample("Hydrating Serum", "Hyaluronic acid serum, 30ml", 3400, 40, "skincare"),
    sample("Clay Mask", "Purifying kaolin clay mask", 2600, 30, "skincare"),
    sample("Lip Balm Trio", "Tinted balms in three shades", 1800, 60, "makeup"),
];

const HOME: &[SampleProduct] = &[
    sample("Linen Throw", "Stonewashed linen throw blanket", 7900, 15, "textiles"),
    sample("Table Lamp", "Ceramic base lamp with linen shade", 9900, 10, "lighting"),
    sample("Scented Candle", "Soy wax candle, 40 hour burn", 2900, 50, "decor"),
];

const SPORTS: &[SampleProduct] = &[
    sample("Yoga Mat", "Non-slip 6mm mat", 4900, 30, "fitness"),
    sample("Running Cap", "Lightweight breathable cap", 2400, 40, "apparel"),
    sample("Resistance Bands", "Set of five latex bands", 2900, 35, "fitness"),
];

const BOOKS: &[SampleProduct] = &[
    sample("The Quiet Garden", "A novel about second chances", 1699, 25, "fiction"),
    sample("Practical Systems", "Field guide to building reliable software", 3999, 15, "non-fiction"),
    sample("Fountain Pen", "Steel nib pen with converter", 2999, 20, "stationery"),
];

const CRYPTO: &[SampleProduct] = &[
    sample("Hardware Wallet", "Offline key storage device", 7900, 20, "security"),
    sample("Genesis Hoodie", "Heavyweight hoodie with embroidered logo", 6500, 25, "apparel"),
    sample("Collector Pin Set", "Enamel pins, limited run", 1900, 50, "collectibles"),
];

const JEWELRY: &[SampleProduct] = &[
    sample("Gold Hoop Earrings", "14k gold-plated hoops", 8900, 15, "earrings"),
    sample("Pearl Necklace", "Freshwater pearls on silk thread", 15900, 8, "necklaces"),
    sample("Signet Ring", "Sterling silver signet ring", 11900, 10, "rings"),
];

/// Sample catalog for a template category; unknown categories get the general set.
pub fn sample_products(category: &str) -> &'static [SampleProduct] {
    match category {
        "fashion" => FASHION,
        "electronics" => ELECTRONICS,
        "food" => FOOD,
        "beauty" => BEAUTY,
        "home" => HOME,
        "sports" => SPORTS,
        "books" => BOOKS,
        "crypto" => CRYPTO,
        "jewelry" => JEWELRY,
        _ => GENERAL,
    }
}

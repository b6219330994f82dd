use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Product;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ProductInput {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub images: Vec<String>,
    pub sku: Option<String>,
    #[serde(default)]
    pub stock_quantity: i32,
    pub category: Option<String>,
    /// Extra attributes stored in the product's metadata blob.
    pub metadata: Option<Value>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub images: Option<Vec<String>>,
    pub sku: Option<String>,
    pub stock_quantity: Option<i32>,
    pub is_active: Option<bool>,
    /// Keys are merged into the existing metadata.
    pub metadata: Option<Value>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DuplicateCheckRequest {
    pub name: String,
    #[serde(default)]
    pub source: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DuplicateCheckResponse {
    pub exists: bool,
    pub product_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateStrategy {
    #[default]
    Skip,
    Update,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ImportRequest {
    #[serde(default = "manual_source")]
    pub source: String,
    #[serde(default)]
    pub on_duplicate: DuplicateStrategy,
    pub items: Vec<ProductInput>,
}

fn manual_source() -> String {
    "manual".to_string()
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AmazonListing {
    pub asin: String,
    pub title: String,
    pub price: Decimal,
    #[serde(default)]
    pub images: Vec<String>,
    pub url: String,
    pub description: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AmazonImportRequest {
    #[serde(default)]
    pub on_duplicate: DuplicateStrategy,
    pub items: Vec<AmazonListing>,
}

#[derive(Debug, Default, Serialize, ToSchema)]
pub struct ImportSummary {
    pub created: Vec<Uuid>,
    pub updated: Vec<Uuid>,
    pub skipped: Vec<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SeedSummary {
    pub created: usize,
    pub skipped: usize,
}

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::{
    builder::BuilderComponent,
    models::{Deployment, Product, Store},
    pricing::PricingConfig,
    templates::Template,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateStoreRequest {
    pub name: String,
    pub subdomain: String,
    pub template_id: Option<String>,
    pub settings: Option<Value>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStoreRequest {
    pub name: Option<String>,
    pub template_id: Option<String>,
    /// Keys are merged into the existing settings; `null` values remove a key.
    pub settings: Option<Value>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StoreListQuery {
    pub all: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct StoreList {
    #[schema(value_type = Vec<Store>)]
    pub items: Vec<Store>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InitStoreResponse {
    pub store: Store,
    pub seeded_products: usize,
    pub layout: Vec<BuilderComponent>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct DeploymentList {
    #[schema(value_type = Vec<Deployment>)]
    pub items: Vec<Deployment>,
}

/// Everything a client needs to draw a storefront in its template's skin.
#[derive(Debug, Serialize, ToSchema)]
pub struct StorefrontView {
    pub store: Store,
    pub theme: Template,
    /// Pages the storefront serves: the theme's pages plus any page with a saved layout.
    pub pages: Vec<String>,
    /// Home page layout.
    pub layout: Vec<BuilderComponent>,
    pub products: Vec<Product>,
    pub pricing: PricingConfig,
}

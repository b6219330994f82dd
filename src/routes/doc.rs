use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    builder::{BuilderComponent, WidgetSpec},
    dto::{
        api_keys::ApiKeyList,
        orders::{CheckoutResponse, OrderList, QuoteResponse},
        products::{ImportSummary, ProductList},
        stores::{DeploymentList, StoreList, StorefrontView},
        templates::TemplateList,
    },
    models::{ApiKey, Deployment, Order, Product, Store, User},
    pricing::{CartLine, CartTotals, PricingConfig},
    response::{ApiResponse, Meta},
    routes::{
        admin, api_keys, auth, builder, health, orders, params, payments, products, storefront,
        stores, templates,
    },
    templates::{ColorScheme, Template, Typography},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::me,
        admin::list_users,
        admin::update_role,
        templates::list_templates,
        templates::get_template,
        templates::template_products,
        storefront::get_storefront,
        storefront::quote,
        storefront::checkout,
        stores::list_stores,
        stores::create_store,
        stores::init_store,
        stores::get_store,
        stores::update_store,
        stores::publish_store,
        stores::unpublish_store,
        stores::list_deployments,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        products::check_duplicate,
        products::import_products,
        products::import_amazon,
        products::seed_products,
        builder::palette,
        builder::get_layout,
        builder::save_layout,
        builder::add_component,
        builder::move_component,
        builder::update_component,
        builder::remove_component,
        orders::list_orders,
        orders::get_order,
        orders::update_order_status,
        payments::create_intent,
        payments::intent_status,
        payments::webhook,
        api_keys::list_keys,
        api_keys::upsert_key,
        api_keys::delete_key
    ),
    components(
        schemas(
            User,
            Store,
            Product,
            Order,
            ApiKey,
            Deployment,
            Template,
            ColorScheme,
            Typography,
            BuilderComponent,
            WidgetSpec,
            PricingConfig,
            CartLine,
            CartTotals,
            StorefrontView,
            QuoteResponse,
            CheckoutResponse,
            ImportSummary,
            StoreList,
            ProductList,
            OrderList,
            DeploymentList,
            TemplateList,
            ApiKeyList,
            params::Pagination,
            params::ProductQuery,
            params::OrderListQuery,
            Meta,
            ApiResponse<Store>,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<Order>,
            ApiResponse<OrderList>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration, login and current user"),
        (name = "Admin", description = "User administration"),
        (name = "Templates", description = "Storefront template registry"),
        (name = "Storefront", description = "Public storefront, cart quotes and checkout"),
        (name = "Stores", description = "Store management"),
        (name = "Products", description = "Catalog, imports and duplicate checks"),
        (name = "Builder", description = "Page layouts and widget palette"),
        (name = "Orders", description = "Order management"),
        (name = "Payments", description = "Payment intents and provider webhooks"),
        (name = "ApiKeys", description = "Third-party service credentials"),
        (name = "Deployments", description = "Publishing storefronts"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

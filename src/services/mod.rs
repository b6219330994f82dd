pub mod api_key_service;
pub mod auth_service;
pub mod builder_service;
pub mod deployment_service;
pub mod order_service;
pub mod payment_service;
pub mod product_service;
pub mod store_service;
pub mod storefront_service;
pub mod template_service;

pub mod api_keys;
pub mod auth;
pub mod builder;
pub mod orders;
pub mod payments;
pub mod products;
pub mod stores;
pub mod templates;

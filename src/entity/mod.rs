pub mod api_keys;
pub mod audit_logs;
pub mod deployments;
pub mod orders;
pub mod page_layouts;
pub mod products;
pub mod stores;
pub mod users;


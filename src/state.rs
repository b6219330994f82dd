use std::sync::Arc;

use crate::{
    config::AppConfig,
    db::{DbPool, OrmConn, orm_from_pool},
    payments::StripeClient,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub config: Arc<AppConfig>,
    pub payments: Option<StripeClient>,
}

impl AppState {
    pub fn new(pool: DbPool, config: AppConfig) -> anyhow::Result<Self> {
        let payments = match &config.stripe {
            Some(stripe) => Some(StripeClient::new(stripe)?),
            None => None,
        };
        Ok(Self {
            orm: orm_from_pool(&pool),
            pool,
            config: Arc::new(config),
            payments,
        })
    }
}

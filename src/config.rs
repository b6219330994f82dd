use std::{env, str::FromStr};

use anyhow::Context;
use rust_decimal::Decimal;
use secrecy::SecretString;

#[derive(Debug)]
pub struct StripeConfig {
    pub secret_key: SecretString,
    pub webhook_secret: Option<SecretString>,
    pub api_base: String,
    pub currency: String,
}

#[derive(Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: SecretString,
    pub jwt_ttl_hours: i64,
    pub storefront_base_domain: String,
    pub free_shipping_threshold: Decimal,
    pub shipping_rate: Decimal,
    pub tax_rate: Decimal,
    pub stripe: Option<StripeConfig>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET is not set")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = parse_var("APP_PORT", 3000)?;

        let stripe = match env::var("STRIPE_SECRET_KEY") {
            Ok(key) if !key.trim().is_empty() => Some(StripeConfig {
                secret_key: SecretString::from(key),
                webhook_secret: env::var("STRIPE_WEBHOOK_SECRET")
                    .ok()
                    .filter(|s| !s.trim().is_empty())
                    .map(SecretString::from),
                api_base: env::var("STRIPE_API_BASE")
                    .unwrap_or_else(|_| "https://api.stripe.com/v1".to_string()),
                currency: env::var("PAYMENT_CURRENCY").unwrap_or_else(|_| "usd".to_string()),
            }),
            _ => None,
        };

        Ok(Self {
            database_url,
            host,
            port,
            jwt_secret: SecretString::from(jwt_secret),
            jwt_ttl_hours: parse_var("JWT_TTL_HOURS", 24)?,
            storefront_base_domain: env::var("STOREFRONT_BASE_DOMAIN")
                .unwrap_or_else(|_| "localhost:3000".to_string()),
            free_shipping_threshold: parse_var("FREE_SHIPPING_THRESHOLD", Decimal::new(5000, 2))?,
            shipping_rate: parse_var("FLAT_SHIPPING_RATE", Decimal::new(599, 2))?,
            tax_rate: parse_var("TAX_RATE", Decimal::new(8, 2))?,
            stripe,
        })
    }

    /// Configuration for tests and tooling that never touch the environment.
    pub fn for_tests(database_url: &str) -> Self {
        Self {
            database_url: database_url.to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            jwt_secret: SecretString::from("test-secret".to_string()),
            jwt_ttl_hours: 1,
            storefront_base_domain: "shops.test".to_string(),
            free_shipping_threshold: Decimal::new(5000, 2),
            shipping_rate: Decimal::new(599, 2),
            tax_rate: Decimal::new(8, 2),
            stripe: None,
        }
    }
}

fn parse_var<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("invalid value for {key}: {e}")),
        _ => Ok(default),
    }
}

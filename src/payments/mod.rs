//! Hosted payment provider client (Stripe-compatible REST API).
//!
//! Only the calls the checkout flow needs are wrapped: create a payment
//! intent, read one back, and verify webhook deliveries.

mod webhook;

pub use webhook::*;

use std::{collections::HashMap, sync::Arc};

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

use crate::config::StripeConfig;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payment provider is not configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("invalid webhook signature: {0}")]
    InvalidSignature(String),

    #[error("parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    pub client_secret: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Clone)]
pub struct StripeClient {
    inner: Arc<StripeClientInner>,
}

struct StripeClientInner {
    client: reqwest::Client,
    api_base: String,
    currency: String,
    webhook_secret: Option<SecretString>,
}

impl StripeClient {
    pub fn new(config: &StripeConfig) -> Result<Self, PaymentError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!(
            "Bearer {}",
            config.secret_key.expose_secret()
        ))
        .map_err(|e| PaymentError::Parse(format!("invalid secret key format: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(StripeClientInner {
                client,
                api_base: config.api_base.trim_end_matches('/').to_string(),
                currency: config.currency.to_lowercase(),
                webhook_secret: config
                    .webhook_secret
                    .as_ref()
                    .map(|s| SecretString::from(s.expose_secret().to_string())),
            }),
        })
    }

    pub fn currency(&self) -> &str {
        &self.inner.currency
    }

    /// Create a payment intent for `amount` minor units.
    pub async fn create_payment_intent(
        &self,
        amount: i64,
        metadata: &[(&str, String)],
    ) -> Result<PaymentIntent, PaymentError> {
        let mut form: Vec<(String, String)> = vec![
            ("amount".into(), amount.to_string()),
            ("currency".into(), self.inner.currency.clone()),
            ("automatic_payment_methods[enabled]".into(), "true".into()),
        ];
        for (key, value) in metadata {
            form.push((format!("metadata[{key}]"), value.clone()));
        }

        let response = self
            .inner
            .client
            .post(format!("{}/payment_intents", self.inner.api_base))
            .form(&form)
            .send()
            .await?;

        Self::parse(response).await
    }

    pub async fn retrieve_payment_intent(&self, id: &str) -> Result<PaymentIntent, PaymentError> {
        let response = self
            .inner
            .client
            .get(format!("{}/payment_intents/{id}", self.inner.api_base))
            .send()
            .await?;

        Self::parse(response).await
    }

    /// Verify a webhook delivery and decode its event.
    pub fn verify_webhook(&self, payload: &str, signature_header: &str) -> Result<WebhookEvent, PaymentError> {
        let secret = self
            .inner
            .webhook_secret
            .as_ref()
            .ok_or(PaymentError::NotConfigured)?;
        verify_signature(
            secret.expose_secret(),
            payload,
            signature_header,
            chrono::Utc::now().timestamp(),
        )?;
        serde_json::from_str(payload).map_err(|e| PaymentError::Parse(e.to_string()))
    }

    async fn parse(response: reqwest::Response) -> Result<PaymentIntent, PaymentError> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorEnvelope>()
                .await
                .ok()
                .and_then(|e| e.error.message)
                .unwrap_or_else(|| status.to_string());
            return Err(PaymentError::Api {
                status: status.as_u16(),
                message,
            });
        }
        response
            .json::<PaymentIntent>()
            .await
            .map_err(|e| PaymentError::Parse(e.to_string()))
    }
}

use secrecy::SecretString;
use serde_json::json;
use store_builder_api::{
    config::StripeConfig,
    payments::{PaymentError, SIGNATURE_TOLERANCE_SECS, StripeClient, sign, verify_signature},
    services::payment_service::order_transition,
};

const SECRET: &str = "whsec_test";

fn event_payload(event_type: &str, order_id: &str) -> String {
    json!({
        "id": "evt_1",
        "type": event_type,
        "data": {
            "object": {
                "id": "pi_123",
                "object": "payment_intent",
                "metadata": { "order_id": order_id }
            }
        }
    })
    .to_string()
}

#[test]
fn valid_signature_passes() {
    let payload = event_payload("payment_intent.succeeded", "abc");
    let ts = 1_700_000_000;
    let sig = sign(SECRET, ts, &payload).expect("sign");
    let header = format!("t={ts},v1={sig}");
    assert!(verify_signature(SECRET, &payload, &header, ts + 10).is_ok());
}

#[test]
fn any_matching_v1_entry_is_accepted() {
    let payload = "{}";
    let ts = 1_700_000_000;
    let sig = sign(SECRET, ts, payload).expect("sign");
    let header = format!("t={ts},v1={},v0=legacy,v1={sig}", "00".repeat(32));
    assert!(verify_signature(SECRET, payload, &header, ts).is_ok());
}

#[test]
fn tampered_payload_or_wrong_secret_fails() {
    let payload = event_payload("payment_intent.succeeded", "abc");
    let ts = 1_700_000_000;
    let sig = sign(SECRET, ts, &payload).expect("sign");
    let header = format!("t={ts},v1={sig}");

    let tampered = payload.replace("abc", "xyz");
    assert!(matches!(
        verify_signature(SECRET, &tampered, &header, ts),
        Err(PaymentError::InvalidSignature(_))
    ));
    assert!(verify_signature("whsec_other", &payload, &header, ts).is_err());
}

#[test]
fn stale_or_malformed_headers_fail() {
    let payload = "{}";
    let ts = 1_700_000_000;
    let sig = sign(SECRET, ts, payload).expect("sign");
    let header = format!("t={ts},v1={sig}");

    assert!(verify_signature(SECRET, payload, &header, ts + SIGNATURE_TOLERANCE_SECS).is_ok());
    assert!(verify_signature(SECRET, payload, &header, ts + SIGNATURE_TOLERANCE_SECS + 1).is_err());
    assert!(verify_signature(SECRET, payload, &format!("v1={sig}"), ts).is_err());
    assert!(verify_signature(SECRET, payload, &format!("t={ts}"), ts).is_err());
    assert!(verify_signature(SECRET, payload, "garbage", ts).is_err());
    assert!(matches!(
        verify_signature(SECRET, payload, "t=-9223372036854775808,v1=00", ts),
        Err(PaymentError::InvalidSignature(_))
    ));
    assert!(verify_signature(SECRET, payload, "t=9223372036854775807,v1=00", -ts).is_err());
}

#[test]
fn client_verifies_and_parses_events() {
    let client = StripeClient::new(&StripeConfig {
        secret_key: SecretString::from("sk_test_123".to_string()),
        webhook_secret: Some(SecretString::from(SECRET.to_string())),
        api_base: "http://127.0.0.1:9".to_string(),
        currency: "usd".to_string(),
    })
    .expect("client");

    let payload = event_payload("payment_intent.payment_failed", "order-1");
    let ts = chrono::Utc::now().timestamp();
    let header = format!("t={ts},v1={}", sign(SECRET, ts, &payload).expect("sign"));

    let event = client.verify_webhook(&payload, &header).expect("event");
    assert_eq!(event.event_type, "payment_intent.payment_failed");
    assert_eq!(event.object_id(), Some("pi_123"));
    assert_eq!(event.metadata_value("order_id"), Some("order-1"));
}

#[test]
fn client_without_webhook_secret_is_not_configured() {
    let client = StripeClient::new(&StripeConfig {
        secret_key: SecretString::from("sk_test_123".to_string()),
        webhook_secret: None,
        api_base: "http://127.0.0.1:9".to_string(),
        currency: "usd".to_string(),
    })
    .expect("client");
    assert!(matches!(
        client.verify_webhook("{}", "t=1,v1=00"),
        Err(PaymentError::NotConfigured)
    ));
}

#[test]
fn events_map_to_order_updates() {
    assert_eq!(
        order_transition("payment_intent.succeeded"),
        Some((Some("paid"), "paid"))
    );
    assert_eq!(
        order_transition("payment_intent.payment_failed"),
        Some((None, "failed"))
    );
    assert_eq!(
        order_transition("payment_intent.canceled"),
        Some((None, "cancelled"))
    );
    assert_eq!(order_transition("charge.refunded"), None);
}

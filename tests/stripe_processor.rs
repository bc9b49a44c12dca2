use eyewear_checkout::config::SecretKey;
use eyewear_checkout::domain::metadata::IntentParams;
use eyewear_checkout::processors::stripe::StripeProcessor;
use eyewear_checkout::processors::{PaymentProcessor, ProcessorFailure};
use serde_json::json;
use std::collections::BTreeMap;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn params() -> IntentParams {
    let mut metadata = BTreeMap::new();
    metadata.insert("source".to_string(), "website".to_string());
    IntentParams {
        amount_minor: 5000,
        currency: "eur".to_string(),
        metadata,
        receipt_email: None,
        shipping: None,
        automatic_payment_methods: true,
        idempotency_key: "chk_1".to_string(),
    }
}

#[tokio::test]
async fn creates_intent_with_bearer_key_and_idempotency_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/payment_intents"))
        .and(header("authorization", "Bearer sk_test_123"))
        .and(header("idempotency-key", "chk_1"))
        .and(body_string_contains("amount=5000"))
        .and(body_string_contains("currency=eur"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "pi_1",
            "object": "payment_intent",
            "client_secret": "pi_1_secret_abc"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let processor = StripeProcessor::new(&server.uri(), 2_000, 0);
    let intent = processor
        .create_intent(&SecretKey::new("sk_test_123"), &params())
        .await
        .unwrap();

    assert_eq!(intent.id, "pi_1");
    assert_eq!(intent.client_secret, "pi_1_secret_abc");
}

#[tokio::test]
async fn rejection_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/payment_intents"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "type": "invalid_request_error",
                "code": "amount_too_small",
                "param": "amount",
                "message": "Amount must be at least €0.50 eur"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let processor = StripeProcessor::new(&server.uri(), 2_000, 3);
    let failure = processor
        .create_intent(&SecretKey::new("sk_test_123"), &params())
        .await
        .unwrap_err();

    assert_eq!(failure.relayable_message(), Some("Amount must be at least €0.50 eur"));
}

#[tokio::test]
async fn missing_client_secret_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/payment_intents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "pi_1"})))
        .mount(&server)
        .await;

    let processor = StripeProcessor::new(&server.uri(), 2_000, 0);
    let failure = processor
        .create_intent(&SecretKey::new("sk_test_123"), &params())
        .await
        .unwrap_err();

    assert_eq!(failure, ProcessorFailure::InvalidResponse);
}

#[tokio::test]
async fn slow_processor_is_a_transport_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/payment_intents"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": "pi_1", "client_secret": "s"}))
                .set_delay(std::time::Duration::from_millis(500)),
        )
        .expect(2)
        .mount(&server)
        .await;

    let processor = StripeProcessor::new(&server.uri(), 50, 1);
    let failure = processor
        .create_intent(&SecretKey::new("sk_test_123"), &params())
        .await
        .unwrap_err();

    assert_eq!(failure, ProcessorFailure::Transport { timeout: true });
}

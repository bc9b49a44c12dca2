use crate::config::{CheckoutDefaults, CredentialProvider};
use crate::domain::checkout::{cart_total_minor, normalize, parse_body, CheckoutOrder};
use crate::domain::metadata::build_intent_params;
use crate::domain::payment_intent::PaymentIntentResponse;
use crate::error::{CheckoutError, GENERIC_PROCESSOR_MESSAGE};
use crate::processors::PaymentProcessor;
use std::sync::Arc;
use tracing::{debug, info, warn};

const MAX_IDEMPOTENCY_KEY_LEN: usize = 255;

#[derive(Clone)]
pub struct PaymentIntentService {
    pub processor: Arc<dyn PaymentProcessor>,
    pub credentials: Arc<dyn CredentialProvider>,
    pub defaults: CheckoutDefaults,
}

impl PaymentIntentService {
    /// Validates a raw checkout body and creates one payment intent for it.
    pub async fn create_payment_intent(
        &self,
        body: &[u8],
        idempotency_key: Option<&str>,
    ) -> Result<PaymentIntentResponse, CheckoutError> {
        let result = self.create(body, idempotency_key).await;
        if let Err(err) = &result {
            warn!(kind = err.kind(), error = %err, "payment intent creation failed");
        }
        result
    }

    async fn create(
        &self,
        body: &[u8],
        idempotency_key: Option<&str>,
    ) -> Result<PaymentIntentResponse, CheckoutError> {
        let raw = parse_body(body)?;
        let order = normalize(raw, &self.defaults)?;
        let secret_key = self
            .credentials
            .secret_key()
            .ok_or(CheckoutError::Misconfigured)?;

        flag_cart_mismatch(&order);

        let key = resolve_idempotency_key(idempotency_key);
        let params = build_intent_params(&order, &key);

        let intent = self
            .processor
            .create_intent(&secret_key, &params)
            .await
            .map_err(|failure| {
                debug!(processor = self.processor.name(), failure = %failure, "processor call failed");
                CheckoutError::Processor {
                    safe_message: failure
                        .relayable_message()
                        .unwrap_or(GENERIC_PROCESSOR_MESSAGE)
                        .to_string(),
                }
            })?;

        info!(
            payment_intent_id = %intent.id,
            amount_minor = order.amount_minor,
            currency = %order.currency,
            "payment intent created"
        );

        Ok(PaymentIntentResponse {
            client_secret: intent.client_secret,
            payment_intent_id: intent.id,
        })
    }
}

pub fn resolve_idempotency_key(client_key: Option<&str>) -> String {
    client_key
        .map(str::trim)
        .filter(|k| !k.is_empty() && k.len() <= MAX_IDEMPOTENCY_KEY_LEN)
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

// The charged amount comes from the client and is not re-priced here; a
// mismatch with the reported cart is surfaced for follow-up only.
fn flag_cart_mismatch(order: &CheckoutOrder) {
    if order.cart_items.is_empty() {
        return;
    }
    let Some(cart_total) = cart_total_minor(&order.cart_items) else {
        warn!(
            amount_minor = order.amount_minor,
            "reported cart total is out of range"
        );
        return;
    };
    if cart_total != order.amount_minor {
        warn!(
            amount_minor = order.amount_minor,
            cart_total_minor = cart_total,
            "requested amount differs from reported cart total"
        );
    }
}

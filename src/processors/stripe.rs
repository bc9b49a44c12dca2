use crate::config::SecretKey;
use crate::domain::metadata::IntentParams;
use crate::processors::{CreatedIntent, PaymentProcessor, ProcessorFailure};
use serde::Deserialize;
use tracing::warn;

pub struct StripeProcessor {
    pub base_url: String,
    pub timeout_ms: u64,
    pub network_retries: u32,
    pub client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct StripeIntent {
    id: String,
    client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorEnvelope {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    code: Option<String>,
    param: Option<String>,
    message: Option<String>,
}

impl StripeProcessor {
    pub fn new(base_url: &str, timeout_ms: u64, network_retries: u32) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_ms,
            network_retries,
            client: reqwest::Client::new(),
        }
    }

    async fn send_once(
        &self,
        secret_key: &SecretKey,
        params: &IntentParams,
    ) -> Result<CreatedIntent, ProcessorFailure> {
        let url = format!("{}/v1/payment_intents", self.base_url);
        let resp = self
            .client
            .post(url)
            .bearer_auth(secret_key.expose())
            .header("Idempotency-Key", &params.idempotency_key)
            .form(&form_fields(params))
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await
            .map_err(|e| ProcessorFailure::Transport {
                timeout: e.is_timeout(),
            })?;

        let status = resp.status();
        if status.is_success() {
            let intent: StripeIntent = resp
                .json()
                .await
                .map_err(|_| ProcessorFailure::InvalidResponse)?;
            let client_secret = intent
                .client_secret
                .ok_or(ProcessorFailure::InvalidResponse)?;
            return Ok(CreatedIntent {
                id: intent.id,
                client_secret,
            });
        }

        let body = resp.text().await.unwrap_or_default();
        Err(rejection(status.as_u16(), &body))
    }
}

#[async_trait::async_trait]
impl PaymentProcessor for StripeProcessor {
    fn name(&self) -> &'static str {
        "stripe"
    }

    async fn create_intent(
        &self,
        secret_key: &SecretKey,
        params: &IntentParams,
    ) -> Result<CreatedIntent, ProcessorFailure> {
        let mut attempt = 0;
        loop {
            match self.send_once(secret_key, params).await {
                Err(ProcessorFailure::Transport { timeout }) if attempt < self.network_retries => {
                    attempt += 1;
                    warn!(attempt, timeout, "retrying payment intent creation after transport failure");
                }
                other => return other,
            }
        }
    }
}

pub fn form_fields(params: &IntentParams) -> Vec<(String, String)> {
    let mut fields = vec![
        ("amount".to_string(), params.amount_minor.to_string()),
        ("currency".to_string(), params.currency.clone()),
        (
            "automatic_payment_methods[enabled]".to_string(),
            params.automatic_payment_methods.to_string(),
        ),
    ];

    for (key, value) in &params.metadata {
        fields.push((format!("metadata[{}]", key), value.clone()));
    }

    if let Some(email) = &params.receipt_email {
        fields.push(("receipt_email".to_string(), email.clone()));
    }

    if let Some(shipping) = &params.shipping {
        fields.push(("shipping[name]".to_string(), shipping.name.clone()));
        fields.push(("shipping[address][line1]".to_string(), shipping.line1.clone()));
        if let Some(line2) = &shipping.line2 {
            fields.push(("shipping[address][line2]".to_string(), line2.clone()));
        }
        fields.push(("shipping[address][city]".to_string(), shipping.city.clone()));
        fields.push((
            "shipping[address][postal_code]".to_string(),
            shipping.postal_code.clone(),
        ));
        fields.push(("shipping[address][country]".to_string(), shipping.country.clone()));
    }

    fields
}

fn rejection(status: u16, body: &str) -> ProcessorFailure {
    match serde_json::from_str::<StripeErrorEnvelope>(body) {
        Ok(envelope) => ProcessorFailure::Rejected {
            status,
            code: envelope.error.code,
            param: envelope.error.param,
            message: envelope.error.message,
        },
        Err(_) => ProcessorFailure::Rejected {
            status,
            code: None,
            param: None,
            message: None,
        },
    }
}

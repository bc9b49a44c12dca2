use eyewear_checkout::config::{AppConfig, CredentialProvider, EnvCredentials, SECRET_KEY_ENV};
use eyewear_checkout::processors::stripe::StripeProcessor;
use eyewear_checkout::service::payment_intent_service::PaymentIntentService;
use eyewear_checkout::AppState;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();
    let credentials = EnvCredentials::default();
    if credentials.secret_key().is_none() {
        tracing::warn!("{} is not set; checkout requests will be rejected", SECRET_KEY_ENV);
    }

    let processor = Arc::new(StripeProcessor::new(
        &cfg.stripe_api_base,
        cfg.processor_timeout_ms,
        cfg.processor_network_retries,
    ));

    let payment_intent_service = PaymentIntentService {
        processor,
        credentials: Arc::new(credentials),
        defaults: cfg.defaults.clone(),
    };

    let app = eyewear_checkout::app(AppState {
        payment_intent_service,
    });

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}

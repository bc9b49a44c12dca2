pub mod config;
pub mod domain {
    pub mod checkout;
    pub mod metadata;
    pub mod payment_intent;
}
pub mod error;
pub mod http {
    pub mod handlers {
        pub mod ops;
        pub mod payment_intents;
    }
}
pub mod processors;
pub mod service {
    pub mod payment_intent_service;
}

use axum::routing::{any, get};
use axum::Router;

#[derive(Clone)]
pub struct AppState {
    pub payment_intent_service: service::payment_intent_service::PaymentIntentService,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/ops/liveness", get(http::handlers::ops::liveness))
        .route(
            "/create-payment-intent",
            any(http::handlers::payment_intents::create_payment_intent),
        )
        .route(
            "/api/create-payment-intent",
            any(http::handlers::payment_intents::create_payment_intent),
        )
        .with_state(state)
}

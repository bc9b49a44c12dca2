use crate::domain::payment_intent::ErrorBody;
use crate::error::CheckoutError;
use crate::service::payment_intent_service::PaymentIntentService;
use crate::AppState;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::warn;

pub const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

#[derive(Debug, Clone, PartialEq)]
pub struct EndpointResponse {
    pub status: StatusCode,
    pub body: Option<serde_json::Value>,
}

impl EndpointResponse {
    fn error(err: &CheckoutError) -> Self {
        Self {
            status: err.status(),
            body: serde_json::to_value(ErrorBody {
                error: err.public_message(),
            })
            .ok(),
        }
    }

    fn rejected(err: CheckoutError) -> Self {
        warn!(kind = err.kind(), error = %err, "payment intent creation failed");
        Self::error(&err)
    }
}

/// Runtime-independent request handling shared by every hosting route.
pub async fn dispatch(
    service: &PaymentIntentService,
    method: &Method,
    headers: &HeaderMap,
    body: &[u8],
) -> EndpointResponse {
    if *method == Method::OPTIONS {
        return EndpointResponse {
            status: StatusCode::OK,
            body: None,
        };
    }
    if *method != Method::POST {
        return EndpointResponse::rejected(CheckoutError::MethodNotAllowed);
    }

    let idempotency_key = headers
        .get(IDEMPOTENCY_HEADER)
        .and_then(|h| h.to_str().ok());

    match service.create_payment_intent(body, idempotency_key).await {
        Ok(resp) => EndpointResponse {
            status: StatusCode::OK,
            body: serde_json::to_value(resp).ok(),
        },
        Err(err) => EndpointResponse::error(&err),
    }
}

pub async fn create_payment_intent(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let out = match body {
        Ok(body) => dispatch(&state.payment_intent_service, &method, &headers, &body).await,
        // An unreadable body only matters once the method is known to be POST.
        Err(_) if method == Method::POST => EndpointResponse::rejected(CheckoutError::MalformedRequest),
        Err(_) => dispatch(&state.payment_intent_service, &method, &headers, &[]).await,
    };
    let mut response = match out.body {
        Some(body) => (out.status, Json(body)).into_response(),
        None => out.status.into_response(),
    };
    apply_cors(response.headers_mut());
    response
}

pub fn apply_cors(headers: &mut HeaderMap) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
}

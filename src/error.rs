use axum::http::StatusCode;
use thiserror::Error;

pub const GENERIC_PROCESSOR_MESSAGE: &str = "Payment processing failed";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("Invalid request body")]
    MalformedRequest,
    #[error("Invalid amount")]
    InvalidAmount,
    #[error("Payment service is not configured")]
    Misconfigured,
    #[error("{safe_message}")]
    Processor { safe_message: String },
    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl CheckoutError {
    pub fn kind(&self) -> &'static str {
        match self {
            CheckoutError::MalformedRequest => "MALFORMED_REQUEST",
            CheckoutError::InvalidAmount => "INVALID_AMOUNT",
            CheckoutError::Misconfigured => "MISCONFIGURED",
            CheckoutError::Processor { .. } => "PROCESSOR_ERROR",
            CheckoutError::MethodNotAllowed => "METHOD_NOT_ALLOWED",
        }
    }

    // Misconfigured stays a 400 to match what deployed clients already handle.
    pub fn status(&self) -> StatusCode {
        match self {
            CheckoutError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    pub fn public_message(&self) -> String {
        self.to_string()
    }
}

use crate::config::SecretKey;
use crate::domain::metadata::IntentParams;
use thiserror::Error;

pub mod mock;
pub mod stripe;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedIntent {
    pub id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessorFailure {
    #[error("processor unreachable (timeout: {timeout})")]
    Transport { timeout: bool },
    #[error("processor rejected the request with HTTP {status} (code: {code:?}, param: {param:?})")]
    Rejected {
        status: u16,
        code: Option<String>,
        param: Option<String>,
        message: Option<String>,
    },
    #[error("processor returned an unexpected response")]
    InvalidResponse,
}

const RELAYED_PARAMS: [&str; 2] = ["amount", "currency"];
const RELAYED_CODES: [&str; 3] = ["amount_too_small", "amount_too_large", "invalid_currency"];

impl ProcessorFailure {
    /// The processor's own message, only when it concerns amount or currency
    /// and can be shown to a shopper as is.
    pub fn relayable_message(&self) -> Option<&str> {
        match self {
            ProcessorFailure::Rejected {
                code,
                param,
                message: Some(message),
                ..
            } => {
                let param_ok = param
                    .as_deref()
                    .is_some_and(|p| RELAYED_PARAMS.contains(&p));
                let code_ok = code.as_deref().is_some_and(|c| RELAYED_CODES.contains(&c));
                (param_ok || code_ok).then_some(message.as_str())
            }
            _ => None,
        }
    }
}

#[async_trait::async_trait]
pub trait PaymentProcessor: Send + Sync {
    fn name(&self) -> &'static str;

    async fn create_intent(
        &self,
        secret_key: &SecretKey,
        params: &IntentParams,
    ) -> Result<CreatedIntent, ProcessorFailure>;
}

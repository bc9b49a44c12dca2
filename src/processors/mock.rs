use crate::config::SecretKey;
use crate::domain::metadata::IntentParams;
use crate::processors::{CreatedIntent, PaymentProcessor, ProcessorFailure};
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub enum MockBehavior {
    Succeed { id: String, client_secret: String },
    Fail(ProcessorFailure),
}

/// In-process processor that records every call it receives.
pub struct MockProcessor {
    pub behavior: MockBehavior,
    calls: Mutex<Vec<IntentParams>>,
}

impl MockProcessor {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding(id: &str, client_secret: &str) -> Self {
        Self::new(MockBehavior::Succeed {
            id: id.to_string(),
            client_secret: client_secret.to_string(),
        })
    }

    pub fn failing(failure: ProcessorFailure) -> Self {
        Self::new(MockBehavior::Fail(failure))
    }

    pub fn calls(&self) -> Vec<IntentParams> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl PaymentProcessor for MockProcessor {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn create_intent(
        &self,
        _secret_key: &SecretKey,
        params: &IntentParams,
    ) -> Result<CreatedIntent, ProcessorFailure> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(params.clone());
        }

        match &self.behavior {
            MockBehavior::Succeed { id, client_secret } => Ok(CreatedIntent {
                id: id.clone(),
                client_secret: client_secret.clone(),
            }),
            MockBehavior::Fail(failure) => Err(failure.clone()),
        }
    }
}

use std::fmt;

pub const SECRET_KEY_ENV: &str = "STRIPE_SECRET_KEY";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub stripe_api_base: String,
    pub processor_timeout_ms: u64,
    pub processor_network_retries: u32,
    pub defaults: CheckoutDefaults,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutDefaults {
    pub currency: String,
    pub shipping_country: String,
    pub order_source: String,
}

impl Default for CheckoutDefaults {
    fn default() -> Self {
        Self {
            currency: "eur".to_string(),
            shipping_country: "FR".to_string(),
            order_source: "website".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let fallback = CheckoutDefaults::default();
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            stripe_api_base: std::env::var("STRIPE_API_BASE")
                .unwrap_or_else(|_| "https://api.stripe.com".to_string()),
            processor_timeout_ms: std::env::var("PROCESSOR_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(30_000),
            processor_network_retries: std::env::var("PROCESSOR_NETWORK_RETRIES")
                .ok()
                .and_then(|s| s.parse::<u32>().ok())
                .unwrap_or(0),
            defaults: CheckoutDefaults {
                currency: non_blank_env("DEFAULT_CURRENCY")
                    .map(|c| c.to_lowercase())
                    .unwrap_or(fallback.currency),
                shipping_country: non_blank_env("DEFAULT_SHIPPING_COUNTRY")
                    .map(|c| c.to_uppercase())
                    .unwrap_or(fallback.shipping_country),
                order_source: non_blank_env("DEFAULT_ORDER_SOURCE").unwrap_or(fallback.order_source),
            },
        }
    }
}

fn non_blank_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Processor API key. Never printed: `Debug` is redacted and there is no `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(String);

impl SecretKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(***)")
    }
}

pub trait CredentialProvider: Send + Sync {
    fn secret_key(&self) -> Option<SecretKey>;
}

/// Reads the key from the process environment on every call.
pub struct EnvCredentials {
    pub var: String,
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self {
            var: SECRET_KEY_ENV.to_string(),
        }
    }
}

impl CredentialProvider for EnvCredentials {
    fn secret_key(&self) -> Option<SecretKey> {
        non_blank_env(&self.var).map(SecretKey)
    }
}

pub struct StaticCredentials(pub Option<String>);

impl StaticCredentials {
    pub fn present(key: &str) -> Self {
        Self(Some(key.to_string()))
    }

    pub fn absent() -> Self {
        Self(None)
    }
}

impl CredentialProvider for StaticCredentials {
    fn secret_key(&self) -> Option<SecretKey> {
        self.0
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(SecretKey::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_key_debug_is_redacted() {
        let key = SecretKey::new("sk_live_abc");
        assert_eq!(format!("{:?}", key), "SecretKey(***)");
    }

    #[test]
    fn blank_static_credential_counts_as_absent() {
        assert!(StaticCredentials(Some("   ".to_string())).secret_key().is_none());
        assert!(StaticCredentials::absent().secret_key().is_none());
        assert_eq!(
            StaticCredentials::present("sk_test").secret_key().map(|k| k.expose().to_string()),
            Some("sk_test".to_string())
        );
    }

    #[test]
    fn env_credentials_read_on_each_call() {
        let creds = EnvCredentials {
            var: "EYEWEAR_CHECKOUT_TEST_KEY_ROTATION".to_string(),
        };
        std::env::remove_var(&creds.var);
        assert!(creds.secret_key().is_none());
        std::env::set_var(&creds.var, "sk_test_1");
        assert_eq!(creds.secret_key().map(|k| k.expose().to_string()).as_deref(), Some("sk_test_1"));
        std::env::remove_var(&creds.var);
        assert!(creds.secret_key().is_none());
    }
}

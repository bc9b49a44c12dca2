use crate::config::CheckoutDefaults;
use crate::domain::payment_intent::{RawCartItem, RawPaymentIntentRequest, RawShippingAddress};
use crate::error::CheckoutError;

pub const MIN_AMOUNT_MINOR: i64 = 50;
pub const MAX_AMOUNT_MINOR: i64 = 99_999_999;

/// A checkout request with every default applied. Built once at the boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutOrder {
    pub amount_minor: i64,
    pub currency: String,
    pub source: String,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub cart_items: Vec<CartLine>,
    pub shipping: Option<ShippingAddress>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub title: String,
    pub quantity: u32,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingAddress {
    pub address: String,
    pub address_complement: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub country_code: String,
}

pub fn parse_body(body: &[u8]) -> Result<RawPaymentIntentRequest, CheckoutError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|_| CheckoutError::MalformedRequest)?;
    if !value.is_object() {
        return Err(CheckoutError::MalformedRequest);
    }
    serde_json::from_value(value).map_err(|_| CheckoutError::MalformedRequest)
}

pub fn validate_amount(amount: Option<&serde_json::Value>) -> Result<i64, CheckoutError> {
    let number = match amount {
        Some(serde_json::Value::Number(n)) => n,
        _ => return Err(CheckoutError::InvalidAmount),
    };

    let minor = if let Some(i) = number.as_i64() {
        i
    } else if let Some(f) = number.as_f64() {
        if f.fract() != 0.0 || !f.is_finite() || f.abs() > MAX_AMOUNT_MINOR as f64 {
            return Err(CheckoutError::InvalidAmount);
        }
        f as i64
    } else {
        return Err(CheckoutError::InvalidAmount);
    };

    if !(MIN_AMOUNT_MINOR..=MAX_AMOUNT_MINOR).contains(&minor) {
        return Err(CheckoutError::InvalidAmount);
    }
    Ok(minor)
}

pub fn normalize(
    raw: RawPaymentIntentRequest,
    defaults: &CheckoutDefaults,
) -> Result<CheckoutOrder, CheckoutError> {
    let amount_minor = validate_amount(raw.amount.as_ref())?;

    let currency = non_blank(raw.currency)
        .map(|c| c.to_lowercase())
        .unwrap_or_else(|| defaults.currency.clone());

    let buyer = raw.metadata.unwrap_or_default();
    let source = non_blank(buyer.source).unwrap_or_else(|| defaults.order_source.clone());
    let customer_name = non_blank(buyer.customer_name).unwrap_or_default();
    let customer_email = non_blank(buyer.customer_email);

    let cart_items = raw
        .cart_items
        .unwrap_or_default()
        .into_iter()
        .map(cart_line)
        .collect();

    let shipping = raw
        .shipping_address
        .map(|a| shipping_address(a, &defaults.shipping_country));

    Ok(CheckoutOrder {
        amount_minor,
        currency,
        source,
        customer_name,
        customer_email,
        cart_items,
        shipping,
    })
}

/// Sum of the client-reported cart in minor units. Informational only;
/// `None` when a line or the total does not fit in an `i64`.
pub fn cart_total_minor(items: &[CartLine]) -> Option<i64> {
    items.iter().try_fold(0i64, |total, i| {
        let unit = (i.price * 100.0).round();
        if !unit.is_finite() || unit.abs() >= i64::MAX as f64 {
            return None;
        }
        (unit as i64)
            .checked_mul(i64::from(i.quantity))
            .and_then(|line| total.checked_add(line))
    })
}

fn cart_line(item: RawCartItem) -> CartLine {
    CartLine {
        title: item.title.map(|t| t.trim().to_string()).unwrap_or_default(),
        quantity: item.quantity.unwrap_or(1),
        price: item.price.unwrap_or(0.0),
    }
}

fn shipping_address(raw: RawShippingAddress, default_country: &str) -> ShippingAddress {
    ShippingAddress {
        address: raw.address.map(|s| s.trim().to_string()).unwrap_or_default(),
        address_complement: non_blank(raw.address_complement),
        city: raw.city.map(|s| s.trim().to_string()).unwrap_or_default(),
        postal_code: raw.postal_code.map(|s| s.trim().to_string()).unwrap_or_default(),
        country: raw.country.map(|s| s.trim().to_string()).unwrap_or_default(),
        country_code: non_blank(raw.country_code)
            .map(|c| c.to_uppercase())
            .unwrap_or_else(|| default_country.to_string()),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

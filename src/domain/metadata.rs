use crate::domain::checkout::{CartLine, CheckoutOrder, ShippingAddress};
use serde::Serialize;
use std::collections::BTreeMap;

pub const MAX_SUMMARY_ITEMS: usize = 5;
pub const MAX_SUMMARY_CHARS: usize = 500;
pub const MAX_METADATA_VALUE_CHARS: usize = 500;
pub const MAX_SHIPPING_FIELD_CHARS: usize = 200;
pub const SNAPSHOT_TITLE_CHARS: usize = 50;
pub const SUMMARY_SEPARATOR: &str = ", ";
pub const SHIPPING_NAME_FALLBACK: &str = "Guest";

/// Everything the processor receives for one intent.
#[derive(Debug, Clone, PartialEq)]
pub struct IntentParams {
    pub amount_minor: i64,
    pub currency: String,
    pub metadata: BTreeMap<String, String>,
    pub receipt_email: Option<String>,
    pub shipping: Option<ShippingBlock>,
    pub automatic_payment_methods: bool,
    pub idempotency_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingBlock {
    pub name: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Serialize)]
struct SnapshotItem {
    title: String,
    quantity: u32,
    price: f64,
}

pub fn currency_symbol(currency: &str) -> String {
    match currency.to_lowercase().as_str() {
        "eur" => "€".to_string(),
        "usd" => "$".to_string(),
        "gbp" => "£".to_string(),
        other => format!(" {}", other.to_uppercase()),
    }
}

pub fn cart_summary(items: &[CartLine], currency: &str) -> String {
    let symbol = currency_symbol(currency);
    let rendered = items
        .iter()
        .take(MAX_SUMMARY_ITEMS)
        .map(|i| format!("{}x {} ({}{})", i.quantity, i.title, i.price, symbol))
        .collect::<Vec<_>>()
        .join(SUMMARY_SEPARATOR);
    truncate_chars(&rendered, MAX_SUMMARY_CHARS)
}

pub fn address_line(address: &ShippingAddress) -> String {
    format!(
        "{}, {} {}, {}",
        address.address, address.postal_code, address.city, address.country
    )
}

// Titles shrink until the serialized snapshot fits one metadata value; the
// item list itself is always the first five lines.
pub fn cart_snapshot(items: &[CartLine]) -> String {
    for title_chars in [SNAPSHOT_TITLE_CHARS, 25, 10, 0] {
        let rendered = render_snapshot(items, title_chars);
        if rendered.chars().count() <= MAX_METADATA_VALUE_CHARS {
            return rendered;
        }
    }
    "[]".to_string()
}

fn render_snapshot(items: &[CartLine], title_chars: usize) -> String {
    let snapshot: Vec<SnapshotItem> = items
        .iter()
        .take(MAX_SUMMARY_ITEMS)
        .map(|i| SnapshotItem {
            title: truncate_chars(&i.title, title_chars),
            quantity: i.quantity,
            price: i.price,
        })
        .collect();
    serde_json::to_string(&snapshot).unwrap_or_else(|_| "[]".to_string())
}

pub fn processor_metadata(order: &CheckoutOrder) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::new();
    metadata.insert("source".to_string(), order.source.clone());
    metadata.insert("customer_name".to_string(), order.customer_name.clone());
    metadata.insert(
        "customer_email".to_string(),
        order.customer_email.clone().unwrap_or_default(),
    );
    if let Some(address) = &order.shipping {
        metadata.insert("shipping_address".to_string(), address_line(address));
    }
    metadata.insert(
        "cart_summary".to_string(),
        cart_summary(&order.cart_items, &order.currency),
    );
    metadata.insert("item_count".to_string(), order.cart_items.len().to_string());
    metadata.insert("cart_items".to_string(), cart_snapshot(&order.cart_items));

    for value in metadata.values_mut() {
        *value = truncate_chars(value, MAX_METADATA_VALUE_CHARS);
    }
    metadata
}

pub fn shipping_block(order: &CheckoutOrder) -> Option<ShippingBlock> {
    let cap = |s: &str| truncate_chars(s, MAX_SHIPPING_FIELD_CHARS);
    order.shipping.as_ref().map(|a| ShippingBlock {
        name: if order.customer_name.is_empty() {
            SHIPPING_NAME_FALLBACK.to_string()
        } else {
            cap(&order.customer_name)
        },
        line1: cap(&a.address),
        line2: a.address_complement.as_deref().map(cap),
        city: cap(&a.city),
        postal_code: cap(&a.postal_code),
        country: cap(&a.country_code),
    })
}

pub fn build_intent_params(order: &CheckoutOrder, idempotency_key: &str) -> IntentParams {
    IntentParams {
        amount_minor: order.amount_minor,
        currency: order.currency.clone(),
        metadata: processor_metadata(order),
        receipt_email: order
            .customer_email
            .as_deref()
            .map(|e| truncate_chars(e, MAX_METADATA_VALUE_CHARS)),
        shipping: shipping_block(order),
        automatic_payment_methods: true,
        idempotency_key: idempotency_key.to_string(),
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

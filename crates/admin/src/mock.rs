//! Built-in demo data served by the mock data source.

use marketplace_core::{Analytics, Customer, Merchant, Order};

const MERCHANTS_JSON: &str = include_str!("../data/merchants.json");
const CUSTOMERS_JSON: &str = include_str!("../data/customers.json");
const ORDERS_JSON: &str = include_str!("../data/orders.json");
const ANALYTICS_JSON: &str = include_str!("../data/analytics.json");

/// Demo merchants.
///
/// # Errors
///
/// Returns an error if the embedded data does not match the merchant shape.
pub fn merchants() -> Result<Vec<Merchant>, serde_json::Error> {
    serde_json::from_str(MERCHANTS_JSON)
}

/// Demo customers.
///
/// # Errors
///
/// Returns an error if the embedded data does not match the customer shape.
pub fn customers() -> Result<Vec<Customer>, serde_json::Error> {
    serde_json::from_str(CUSTOMERS_JSON)
}

/// Demo orders, newest first.
///
/// # Errors
///
/// Returns an error if the embedded data does not match the order shape.
pub fn orders() -> Result<Vec<Order>, serde_json::Error> {
    serde_json::from_str(ORDERS_JSON)
}

/// Demo analytics totals.
///
/// # Errors
///
/// Returns an error if the embedded data does not match the analytics shape.
pub fn analytics() -> Result<Analytics, serde_json::Error> {
    serde_json::from_str(ANALYTICS_JSON)
}

//! Marketplace-wide analytics summary.

use serde::{Deserialize, Serialize};

use super::Money;

/// Headline totals with period-over-period growth percentages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub total_revenue: Money,
    pub total_orders: u64,
    pub total_merchants: u64,
    pub total_customers: u64,
    pub revenue_growth: f64,
    pub orders_growth: f64,
    pub merchants_growth: f64,
    pub customers_growth: f64,
}

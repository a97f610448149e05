//! Dashboard summary figures.

use rust_decimal::Decimal;
use serde::Serialize;

use marketplace_core::{Analytics, Customer, Money, Order, OrderStatus};

/// Orders shown in the "recent orders" panel.
pub const RECENT_ORDERS: usize = 5;

/// Order count for one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub label: &'static str,
    pub count: usize,
}

/// Aggregates over the customer list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerSummary {
    pub count: usize,
    pub total_spent: Money,
    pub total_orders: u64,
    /// Total spent divided by total orders, to the cent. Zero without orders.
    pub average_order_value: Money,
}

/// Everything the dashboard landing page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub analytics: Analytics,
    pub recent_orders: Vec<Order>,
    pub order_status_counts: Vec<StatusCount>,
    pub customers: CustomerSummary,
}

/// Count orders per status, covering every status in declaration order.
#[must_use]
pub fn order_status_counts(orders: &[Order]) -> Vec<StatusCount> {
    OrderStatus::ALL
        .iter()
        .map(|status| StatusCount {
            status: *status,
            label: status.label(),
            count: orders.iter().filter(|o| o.status == *status).count(),
        })
        .collect()
}

#[must_use]
pub fn customer_summary(customers: &[Customer]) -> CustomerSummary {
    let total_spent: Money = customers.iter().map(|c| c.total_spent).sum();
    let total_orders: u64 = customers.iter().map(|c| u64::from(c.total_orders)).sum();
    let average_order_value = if total_orders == 0 {
        Money::ZERO
    } else {
        Money::new((total_spent.amount() / Decimal::from(total_orders)).round_dp(2))
    };

    CustomerSummary {
        count: customers.len(),
        total_spent,
        total_orders,
        average_order_value,
    }
}

/// Build the dashboard summary. Recent orders are the first
/// [`RECENT_ORDERS`] in list order.
#[must_use]
pub fn summarize(analytics: Analytics, orders: &[Order], customers: &[Customer]) -> DashboardSummary {
    DashboardSummary {
        analytics,
        recent_orders: orders.iter().take(RECENT_ORDERS).cloned().collect(),
        order_status_counts: order_status_counts(orders),
        customers: customer_summary(customers),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mock;

    #[test]
    fn test_summary_over_mock_data() {
        let orders = mock::orders().unwrap();
        let customers = mock::customers().unwrap();
        let summary = summarize(mock::analytics().unwrap(), &orders, &customers);

        assert_eq!(summary.recent_orders.len(), 5);
        assert_eq!(summary.recent_orders[0].id, orders[0].id);
        assert_eq!(summary.order_status_counts.len(), OrderStatus::ALL.len());
        let counted: usize = summary.order_status_counts.iter().map(|s| s.count).sum();
        assert_eq!(counted, orders.len());
        assert_eq!(summary.customers.count, customers.len());
    }

    #[test]
    fn test_status_counts_include_zeroes() {
        let counts = order_status_counts(&[]);
        assert!(counts.iter().all(|c| c.count == 0));
        assert_eq!(counts[4].label, "In Transit");
    }

    #[test]
    fn test_average_order_value_rounds_to_cents() {
        let mut customers = mock::customers().unwrap();
        customers.truncate(2);
        customers[0].total_spent = Money::from(100);
        customers[0].total_orders = 2;
        customers[1].total_spent = Money::from(1);
        customers[1].total_orders = 1;

        let summary = customer_summary(&customers);
        assert_eq!(summary.total_spent, Money::from(101));
        assert_eq!(summary.total_orders, 3);
        assert_eq!(summary.average_order_value, Money::from_cents(3367));
    }

    #[test]
    fn test_average_order_value_without_orders_is_zero() {
        let summary = customer_summary(&[]);
        assert_eq!(summary.average_order_value, Money::ZERO);
        assert_eq!(summary.total_orders, 0);
    }
}

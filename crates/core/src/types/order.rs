//! Order records.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::record::Record;
use crate::value::Value;

use super::{CustomerId, DeliveryType, MerchantId, Money, OrderId, OrderStatus, PaymentStatus};

/// An order placed by a customer with a merchant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub customer_name: String,
    pub merchant_id: MerchantId,
    pub merchant_name: String,
    pub status: OrderStatus,
    pub total: Money,
    /// Number of line items.
    pub items: u32,
    /// When the order was placed.
    pub order_date: NaiveDateTime,
    /// Scheduled fulfilment date.
    pub date: NaiveDate,
    pub delivery_type: DeliveryType,
    pub payment_status: PaymentStatus,
}

impl Order {
    /// Field keys available through [`Record::field`].
    pub const FIELDS: &'static [&'static str] = &[
        "id",
        "customer_id",
        "customer_name",
        "merchant_id",
        "merchant_name",
        "status",
        "total",
        "items",
        "order_date",
        "date",
        "delivery_type",
        "payment_status",
    ];
}

impl Record for Order {
    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn field(&self, key: &str) -> Value {
        match key {
            "id" => self.id.as_str().into(),
            "customer_id" => self.customer_id.as_str().into(),
            "customer_name" => self.customer_name.as_str().into(),
            "merchant_id" => self.merchant_id.as_str().into(),
            "merchant_name" => self.merchant_name.as_str().into(),
            "status" => self.status.into(),
            "total" => self.total.amount().into(),
            "items" => self.items.into(),
            "order_date" => self.order_date.into(),
            "date" => self.date.into(),
            "delivery_type" => self.delivery_type.into(),
            "payment_status" => self.payment_status.into(),
            _ => Value::Null,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_roundtrip_backend_shape() {
        let input = json!({
            "id": "ORD-1001",
            "customerId": "C001",
            "customerName": "Alice Johnson",
            "merchantId": "M001",
            "merchantName": "Spice Garden",
            "status": "in-transit",
            "total": 45.5,
            "items": 3,
            "orderDate": "2024-01-15T14:30:00",
            "date": "2024-01-15",
            "deliveryType": "delivery",
            "paymentStatus": "paid"
        });
        let order: Order = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(order.status, OrderStatus::InTransit);
        assert_eq!(order.field("status"), Value::from("in-transit"));
        assert_eq!(order.field("order_date"), Value::from("2024-01-15 14:30"));
        assert_eq!(order.field("total").to_string(), "45.5");
        assert_eq!(serde_json::to_value(&order).unwrap(), input);
    }
}

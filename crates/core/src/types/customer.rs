//! Customer records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::record::Record;
use crate::value::Value;

use super::{CustomerId, CustomerStatus, Email, LoyaltyTier, Money};

/// A customer (buyer) on the marketplace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub status: CustomerStatus,
    pub total_orders: u32,
    pub total_spent: Money,
    pub loyalty_points: u32,
    pub loyalty_tier: LoyaltyTier,
    pub join_date: NaiveDate,
    /// Date of the most recent order.
    pub last_order: NaiveDate,
    pub location: String,
}

impl Customer {
    /// Field keys available through [`Record::field`].
    pub const FIELDS: &'static [&'static str] = &[
        "id",
        "name",
        "email",
        "phone",
        "status",
        "total_orders",
        "total_spent",
        "loyalty_points",
        "loyalty_tier",
        "join_date",
        "last_order",
        "location",
    ];
}

impl Record for Customer {
    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn field(&self, key: &str) -> Value {
        match key {
            "id" => self.id.as_str().into(),
            "name" => self.name.as_str().into(),
            "email" => self.email.as_str().into(),
            "phone" => self.phone.as_str().into(),
            "status" => self.status.into(),
            "total_orders" => self.total_orders.into(),
            "total_spent" => self.total_spent.amount().into(),
            "loyalty_points" => self.loyalty_points.into(),
            "loyalty_tier" => self.loyalty_tier.into(),
            "join_date" => self.join_date.into(),
            "last_order" => self.last_order.into(),
            "location" => self.location.as_str().into(),
            _ => Value::Null,
        }
    }
}

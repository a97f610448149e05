//! Merchant records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::record::Record;
use crate::value::Value;

use super::{Email, KycStatus, MerchantId, MerchantStatus, Money};

/// A merchant (seller) on the marketplace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Merchant {
    pub id: MerchantId,
    /// Owner's full name.
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub business_name: String,
    pub category: String,
    pub status: MerchantStatus,
    pub kyc_status: KycStatus,
    /// Lifetime revenue.
    pub revenue: Money,
    /// Lifetime order count.
    pub orders: u32,
    pub join_date: NaiveDate,
    pub location: String,
    /// Average rating, 0.0 to 5.0.
    pub rating: f64,
}

impl Merchant {
    /// Field keys available through [`Record::field`].
    pub const FIELDS: &'static [&'static str] = &[
        "id",
        "name",
        "email",
        "phone",
        "business_name",
        "category",
        "status",
        "kyc_status",
        "revenue",
        "orders",
        "join_date",
        "location",
        "rating",
    ];
}

impl Record for Merchant {
    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn field(&self, key: &str) -> Value {
        match key {
            "id" => self.id.as_str().into(),
            "name" => self.name.as_str().into(),
            "email" => self.email.as_str().into(),
            "phone" => self.phone.as_str().into(),
            "business_name" => self.business_name.as_str().into(),
            "category" => self.category.as_str().into(),
            "status" => self.status.into(),
            "kyc_status" => self.kyc_status.into(),
            "revenue" => self.revenue.amount().into(),
            "orders" => self.orders.into(),
            "join_date" => self.join_date.into(),
            "location" => self.location.as_str().into(),
            "rating" => self.rating.into(),
            _ => Value::Null,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    fn sample() -> Merchant {
        serde_json::from_value(json!({
            "id": "M001",
            "name": "Rajesh Kumar",
            "email": "rajesh@spicegarden.com",
            "phone": "+1 555-0101",
            "businessName": "Spice Garden",
            "category": "Restaurant",
            "status": "active",
            "kycStatus": "approved",
            "revenue": 125000,
            "orders": 1250,
            "joinDate": "2023-01-15",
            "location": "New York, NY",
            "rating": 4.5
        }))
        .unwrap()
    }

    #[test]
    fn test_deserializes_backend_shape() {
        let merchant = sample();
        assert_eq!(merchant.business_name, "Spice Garden");
        assert_eq!(merchant.kyc_status, KycStatus::Approved);
        assert_eq!(merchant.revenue, Money::from(125_000));
    }

    #[test]
    fn test_fields() {
        let merchant = sample();
        assert_eq!(merchant.id(), "M001");
        assert_eq!(merchant.field("business_name"), Value::from("Spice Garden"));
        assert_eq!(merchant.field("status"), Value::from("active"));
        assert_eq!(merchant.field("revenue"), Value::from(125_000_i64));
        assert_eq!(merchant.field("rating"), Value::Number(Decimal::new(45, 1)));
        assert_eq!(merchant.field("join_date"), Value::from("2023-01-15"));
        assert_eq!(merchant.field("nope"), Value::Null);
    }

    #[test]
    fn test_every_listed_field_resolves() {
        let merchant = sample();
        for key in Merchant::FIELDS {
            assert!(!merchant.field(key).is_null(), "field {key} is null");
        }
    }
}

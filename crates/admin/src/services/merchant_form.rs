//! Merchant onboarding form validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use marketplace_core::{Email, KycStatus, Merchant, MerchantId, MerchantStatus, Money};

/// Categories a new merchant may be filed under.
pub const CATEGORIES: &[&str] = &[
    "Restaurant",
    "Cafe",
    "Grocery",
    "Pharmacy",
    "Retail",
    "Bakery",
    "Fast Food",
    "Other",
];

/// Raw merchant form as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MerchantForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub business_name: String,
    pub category: String,
    pub location: String,
}

/// A validated merchant, ready to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMerchant {
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub business_name: String,
    pub category: String,
    pub location: String,
}

/// One failed form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Every problem found in a submitted form.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("invalid merchant form: {} field(s) failed", .errors.len())]
pub struct FormError {
    pub errors: Vec<FieldError>,
}

impl FormError {
    /// Message for `field`, if it failed.
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message)
    }
}

fn required(
    errors: &mut Vec<FieldError>,
    value: &str,
    field: &'static str,
    message: &'static str,
) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.push(FieldError { field, message });
    }
    value.to_string()
}

impl MerchantForm {
    /// Validate the form.
    ///
    /// # Errors
    ///
    /// Returns every failing field, in form order.
    pub fn validate(&self) -> Result<NewMerchant, FormError> {
        let mut errors = Vec::new();

        let name = required(&mut errors, &self.name, "name", "Owner name is required");

        let email = self.email.trim();
        let email = if email.is_empty() {
            errors.push(FieldError {
                field: "email",
                message: "Email is required",
            });
            None
        } else {
            Email::parse(email)
                .map_err(|_| {
                    errors.push(FieldError {
                        field: "email",
                        message: "Invalid email address",
                    });
                })
                .ok()
        };

        let phone = required(&mut errors, &self.phone, "phone", "Phone number is required");
        let business_name = required(
            &mut errors,
            &self.business_name,
            "businessName",
            "Business name is required",
        );
        let category = required(&mut errors, &self.category, "category", "Category is required");
        if !category.is_empty() && !CATEGORIES.contains(&category.as_str()) {
            errors.push(FieldError {
                field: "category",
                message: "Unknown category",
            });
        }
        let location = required(&mut errors, &self.location, "location", "Location is required");

        match email {
            Some(email) if errors.is_empty() => Ok(NewMerchant {
                name,
                email,
                phone,
                business_name,
                category,
                location,
            }),
            _ => Err(FormError { errors }),
        }
    }
}

impl NewMerchant {
    /// Turn the submission into a merchant record awaiting review.
    #[must_use]
    pub fn into_merchant(self, id: MerchantId, join_date: NaiveDate) -> Merchant {
        Merchant {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            business_name: self.business_name,
            category: self.category,
            status: MerchantStatus::Pending,
            kyc_status: KycStatus::Pending,
            revenue: Money::ZERO,
            orders: 0,
            join_date,
            location: self.location,
            rating: 0.0,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> MerchantForm {
        MerchantForm {
            name: "Rosa Diaz".to_string(),
            email: "rosa@pupusaplace.com".to_string(),
            phone: "+1 718-555-0199".to_string(),
            business_name: "Pupusa Place".to_string(),
            category: "Restaurant".to_string(),
            location: "Brooklyn, NY".to_string(),
        }
    }

    #[test]
    fn test_valid_form() {
        let merchant = valid_form().validate().unwrap();
        assert_eq!(merchant.business_name, "Pupusa Place");
        assert_eq!(merchant.email.as_str(), "rosa@pupusaplace.com");
    }

    #[test]
    fn test_fields_are_trimmed() {
        let form = MerchantForm {
            name: "  Rosa Diaz ".to_string(),
            ..valid_form()
        };
        assert_eq!(form.validate().unwrap().name, "Rosa Diaz");
    }

    #[test]
    fn test_empty_form_reports_every_field() {
        let err = MerchantForm::default().validate().unwrap_err();
        let fields: Vec<_> = err.errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["name", "email", "phone", "businessName", "category", "location"]
        );
        assert_eq!(err.message_for("email"), Some("Email is required"));
    }

    #[test]
    fn test_invalid_email() {
        let form = MerchantForm {
            email: "rosa@pupusa".to_string(),
            ..valid_form()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.errors.len(), 1);
        assert_eq!(err.message_for("email"), Some("Invalid email address"));
    }

    #[test]
    fn test_unknown_category() {
        let form = MerchantForm {
            category: "Casino".to_string(),
            ..valid_form()
        };
        assert_eq!(
            form.validate().unwrap_err().message_for("category"),
            Some("Unknown category")
        );
    }

    #[test]
    fn test_form_deserializes_camel_case() {
        let form: MerchantForm = serde_json::from_value(serde_json::json!({
            "name": "Rosa Diaz",
            "businessName": "Pupusa Place"
        }))
        .unwrap();
        assert_eq!(form.business_name, "Pupusa Place");
        assert!(form.email.is_empty());
    }

    #[test]
    fn test_into_merchant_starts_pending() {
        let merchant = valid_form()
            .validate()
            .unwrap()
            .into_merchant(MerchantId::new("M013"), NaiveDate::from_ymd_opt(2024, 3, 16).unwrap());
        assert_eq!(merchant.status, MerchantStatus::Pending);
        assert_eq!(merchant.kyc_status, KycStatus::Pending);
        assert_eq!(merchant.revenue, Money::ZERO);
    }
}

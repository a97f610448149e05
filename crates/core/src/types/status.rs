//! Status enums for marketplace entities.
//!
//! Each status has a wire value (what the backend sends and what facet
//! filters match against) and a human label (what filter dropdowns show).

/// Macro to define a status enum with wire values and labels.
///
/// Generates:
/// - `Serialize`/`Deserialize` using the wire values
/// - `as_str()` (wire value), `label()` (display label) and `ALL`
/// - `Display` (wire value) and `FromStr` (wire value, case-sensitive)
#[macro_export]
macro_rules! define_status {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => ($wire:literal, $label:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The wire value.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }

            /// The human-readable label.
            #[must_use]
            pub const fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    _ => Err(format!(concat!("invalid ", stringify!($name), ": {}"), s)),
                }
            }
        }

        impl From<$name> for $crate::Value {
            fn from(status: $name) -> Self {
                Self::Text(status.as_str().to_owned())
            }
        }
    };
}

define_status!(
    /// Merchant account status.
    MerchantStatus {
        Active => ("active", "Active"),
        Inactive => ("inactive", "Inactive"),
        Pending => ("pending", "Pending"),
        Suspended => ("suspended", "Suspended"),
    }
);

define_status!(
    /// Merchant KYC review status.
    KycStatus {
        Pending => ("pending", "Pending"),
        Approved => ("approved", "Approved"),
        Rejected => ("rejected", "Rejected"),
    }
);

define_status!(
    /// Customer account status.
    CustomerStatus {
        Active => ("active", "Active"),
        Inactive => ("inactive", "Inactive"),
        Blocked => ("blocked", "Blocked"),
    }
);

define_status!(
    /// Customer loyalty program tier.
    LoyaltyTier {
        Bronze => ("Bronze", "Bronze"),
        Silver => ("Silver", "Silver"),
        Gold => ("Gold", "Gold"),
        Platinum => ("Platinum", "Platinum"),
    }
);

define_status!(
    /// Order lifecycle status.
    OrderStatus {
        Pending => ("pending", "Pending"),
        Confirmed => ("confirmed", "Confirmed"),
        Preparing => ("preparing", "Preparing"),
        Ready => ("ready", "Ready"),
        InTransit => ("in-transit", "In Transit"),
        Delivered => ("delivered", "Delivered"),
        Cancelled => ("cancelled", "Cancelled"),
    }
);

define_status!(
    /// How an order reaches the customer.
    DeliveryType {
        Pickup => ("pickup", "Pickup"),
        Delivery => ("delivery", "Delivery"),
    }
);

define_status!(
    /// Order payment status.
    PaymentStatus {
        Paid => ("paid", "Paid"),
        Pending => ("pending", "Pending"),
        Refunded => ("refunded", "Refunded"),
    }
);

define_status!(
    /// Admin role with different permission levels.
    AdminRole {
        /// Full access to all admin features.
        SuperAdmin => ("super_admin", "Super Admin"),
        /// Full access to marketplace management features.
        Admin => ("admin", "Admin"),
        /// Read-only access.
        Viewer => ("viewer", "Viewer"),
    }
);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_values() {
        assert_eq!(OrderStatus::InTransit.as_str(), "in-transit");
        assert_eq!(OrderStatus::InTransit.label(), "In Transit");
        assert_eq!(LoyaltyTier::Gold.to_string(), "Gold");
        assert_eq!(AdminRole::SuperAdmin.label(), "Super Admin");
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "in-transit".parse::<OrderStatus>().unwrap(),
            OrderStatus::InTransit
        );
        assert!("In Transit".parse::<OrderStatus>().is_err());
        assert_eq!(
            "suspended".parse::<MerchantStatus>().unwrap(),
            MerchantStatus::Suspended
        );
    }

    #[test]
    fn test_serde_uses_wire_values() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::InTransit).unwrap(),
            "\"in-transit\""
        );
        let tier: LoyaltyTier = serde_json::from_str("\"Platinum\"").unwrap();
        assert_eq!(tier, LoyaltyTier::Platinum);
    }

    #[test]
    fn test_all_lists_every_variant() {
        assert_eq!(OrderStatus::ALL.len(), 7);
        assert_eq!(KycStatus::ALL[1], KycStatus::Approved);
    }
}

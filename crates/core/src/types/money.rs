//! Monetary amounts using decimal arithmetic.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::value::{decimal_from_json, serialize_decimal};

/// A dollar amount.
///
/// Serialized as a plain JSON number (the marketplace backend sends
/// `"revenue": 125000`), but also accepts numeric strings on input.
///
/// Displays with a `$` prefix, thousands separators and at most two
/// fraction digits, trailing zeros trimmed: `$125,000`, `$45.5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Money(Decimal);

impl Money {
    /// Zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create an amount from whole cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format for display (e.g., "$1,234.5").
    #[must_use]
    pub fn display(&self) -> String {
        format_grouped(self.0, "$")
    }
}

/// Format a decimal with thousands separators, at most two fraction digits.
///
/// Negative amounts keep the sign in front of the prefix (`-$12`).
#[must_use]
pub fn format_grouped(amount: Decimal, prefix: &str) -> String {
    let rounded = amount.round_dp(2).normalize();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = rounded.abs().to_string();
    let (whole, fraction) = text.split_once('.').unwrap_or((&text, ""));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if fraction.is_empty() {
        format!("{sign}{prefix}{grouped}")
    } else {
        format!("{sign}{prefix}{grouped}.{fraction}")
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<i64> for Money {
    fn from(dollars: i64) -> Self {
        Self(Decimal::from(dollars))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Money {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_decimal(self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Number(n) => decimal_from_json(&n)
                .map(Self)
                .ok_or_else(|| D::Error::custom(format!("amount out of range: {n}"))),
            serde_json::Value::String(s) => s
                .parse::<Decimal>()
                .or_else(|_| {
                    s.parse::<f64>()
                        .ok()
                        .and_then(Decimal::from_f64)
                        .ok_or(())
                })
                .map(Self)
                .map_err(|()| D::Error::custom(format!("invalid amount: {s}"))),
            other => Err(D::Error::custom(format!(
                "expected a number or numeric string, got {other}"
            ))),
        }
    }
}

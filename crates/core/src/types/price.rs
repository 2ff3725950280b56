//! Prices as they are stored: decimal text, parsed on demand.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::coerce::parse_float_prefix;

/// A unit price kept in its stored text form (e.g. `"120"`, `"19.99"`).
///
/// Prices arrive from catalog data and persisted carts without validation, so
/// a `Price` may hold text that is not a number at all. Arithmetic goes
/// through [`Price::amount_or_zero`], which makes an unreadable price count as
/// nothing rather than failing the whole cart.
///
/// Deserialization accepts a JSON string or number; serialization always
/// writes a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Price(String);

impl Price {
    /// Create a price from its text form.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Returns the stored text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the leading decimal number of the stored text.
    #[must_use]
    pub fn amount(&self) -> Option<Decimal> {
        parse_float_prefix(&self.0)
    }

    /// The parsed amount, or zero when the text has no leading number.
    #[must_use]
    pub fn amount_or_zero(&self) -> Decimal {
        self.amount().unwrap_or(Decimal::ZERO)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(text) => Self(text),
            Value::Number(number) => Self(number.to_string()),
            _ => Self::default(),
        })
    }
}

impl From<&str> for Price {
    fn from(text: &str) -> Self {
        Self(text.to_owned())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

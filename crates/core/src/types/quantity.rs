//! Line-item quantities.

use core::fmt;
use core::num::NonZeroU32;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::coerce::parse_int_prefix;

/// Number of units of a product in the cart. Always at least one.
///
/// A line whose quantity would drop to zero is removed from the cart, so zero
/// is not representable here. Input from storage or forms goes through
/// [`Quantity::coerce`] / [`Quantity::parse_lenient`], which fall back to one
/// for anything that is not a positive integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Create a quantity, or `None` for zero.
    #[must_use]
    pub const fn new(count: u32) -> Option<Self> {
        match NonZeroU32::new(count) {
            Some(count) => Some(Self(count)),
            None => None,
        }
    }

    /// Create a quantity from a signed count.
    ///
    /// Returns `None` for zero or negative counts; counts above `u32::MAX`
    /// saturate.
    #[must_use]
    pub fn from_count(count: i64) -> Option<Self> {
        if count <= 0 {
            return None;
        }
        Self::new(u32::try_from(count).unwrap_or(u32::MAX))
    }

    /// Read a quantity from free-form text, defaulting to one.
    ///
    /// ```
    /// use shopcart_core::Quantity;
    ///
    /// assert_eq!(Quantity::parse_lenient("3").get(), 3);
    /// assert_eq!(Quantity::parse_lenient("2 boxes").get(), 2);
    /// assert_eq!(Quantity::parse_lenient("lots").get(), 1);
    /// assert_eq!(Quantity::parse_lenient("0").get(), 1);
    /// ```
    #[must_use]
    pub fn parse_lenient(text: &str) -> Self {
        parse_int_prefix(text)
            .and_then(Self::from_count)
            .unwrap_or(Self::ONE)
    }

    /// Read a quantity from any JSON value, defaulting to one.
    ///
    /// Numbers and strings are read through their text form; every other
    /// value (null, booleans, arrays, objects) yields one.
    #[must_use]
    pub fn coerce(value: &Value) -> Self {
        match value {
            Value::Number(number) => Self::parse_lenient(&number.to_string()),
            Value::String(text) => Self::parse_lenient(text),
            _ => Self::ONE,
        }
    }

    /// The count as a plain integer.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Add two quantities, saturating at `u32::MAX`.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0.get()))
    }

    /// Quantity clamped to `1..=max`.
    #[must_use]
    pub fn clamp_to(self, max: Self) -> Self {
        self.min(max)
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::coerce(&Value::deserialize(deserializer)?))
    }
}

impl From<NonZeroU32> for Quantity {
    fn from(count: NonZeroU32) -> Self {
        Self(count)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_new_rejects_zero() {
        assert!(Quantity::new(0).is_none());
        assert_eq!(Quantity::new(4).unwrap().get(), 4);
    }

    #[test]
    fn test_from_count() {
        assert!(Quantity::from_count(0).is_none());
        assert!(Quantity::from_count(-2).is_none());
        assert_eq!(Quantity::from_count(5).unwrap().get(), 5);
        assert_eq!(Quantity::from_count(i64::MAX).unwrap().get(), u32::MAX);
    }

    #[test]
    fn test_coerce_json_values() {
        assert_eq!(Quantity::coerce(&json!(2)).get(), 2);
        assert_eq!(Quantity::coerce(&json!("3")).get(), 3);
        assert_eq!(Quantity::coerce(&json!(2.7)).get(), 2);
        assert_eq!(Quantity::coerce(&json!("abc")).get(), 1);
        assert_eq!(Quantity::coerce(&json!(null)).get(), 1);
        assert_eq!(Quantity::coerce(&json!(-4)).get(), 1);
        assert_eq!(Quantity::coerce(&json!([3])).get(), 1);
    }

    #[test]
    fn test_saturating_add() {
        let two = Quantity::new(2).unwrap();
        let three = Quantity::new(3).unwrap();
        assert_eq!(two.saturating_add(three).get(), 5);

        let max = Quantity::new(u32::MAX).unwrap();
        assert_eq!(max.saturating_add(two).get(), u32::MAX);
    }

    #[test]
    fn test_clamp_to() {
        let ten = Quantity::new(10).unwrap();
        assert_eq!(Quantity::new(25).unwrap().clamp_to(ten).get(), 10);
        assert_eq!(Quantity::new(3).unwrap().clamp_to(ten).get(), 3);
    }

    #[test]
    fn test_serde() {
        let quantity: Quantity = serde_json::from_str("\"4\"").unwrap();
        assert_eq!(quantity.get(), 4);
        assert_eq!(serde_json::to_string(&quantity).unwrap(), "4");
    }
}

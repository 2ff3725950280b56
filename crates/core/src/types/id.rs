//! Product identifiers.
//!
//! A [`ProductId`] is the merge key of a cart: adding a product whose ID is
//! already present bumps that line's quantity instead of appending a new line.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Catalog product identifier.
///
/// IDs are opaque strings. Persisted carts written by older clients sometimes
/// carry numeric IDs (`"id": 1`); those deserialize to their decimal string so
/// they compare equal to the catalog's `"1"`.
///
/// ```
/// use shopcart_core::ProductId;
///
/// let from_text: ProductId = serde_json::from_str("\"1\"").unwrap();
/// let from_number: ProductId = serde_json::from_str("1").unwrap();
/// assert_eq!(from_text, from_number);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the ID and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Text(id) => Self(id),
            Repr::Number(id) => Self(id.to_string()),
        })
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

//! Cart contents and the pure operations on them.
//!
//! [`Cart`] is an ordered list of [`LineItem`]s with unique product IDs. The
//! operations here only transform the in-memory value; reading and writing
//! the persisted record, and telling anyone about the change, is the store's
//! job.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::product::Product;
use crate::types::{Price, ProductId, Quantity};

/// Errors from decoding a persisted cart record.
#[derive(Debug, Error)]
pub enum CartDecodeError {
    /// The record is not valid JSON.
    #[error("cart record is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    /// The record is JSON but not an array of line items.
    #[error("cart record is not a JSON array")]
    NotAnArray,
}

/// Product data supplied when adding to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLineItem {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl From<&Product> for NewLineItem {
    fn from(product: &Product) -> Self {
        product.to_line_item()
    }
}

/// One product-and-quantity entry in the cart.
///
/// Fields other than the known ones are kept in `extra` and written back
/// unchanged, so records written by other clients survive a mutation.
/// Only `id` must be usable; every other known field falls back to a default
/// when it has the wrong type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    #[serde(default, deserialize_with = "lenient_title")]
    pub title: String,
    #[serde(default)]
    pub price: Price,
    #[serde(
        default,
        deserialize_with = "lenient_image",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<String>,
    #[serde(default)]
    pub quantity: Quantity,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LineItem {
    /// Build a line from product data and a quantity.
    #[must_use]
    pub fn new(item: NewLineItem, quantity: Quantity) -> Self {
        Self {
            id: item.id,
            title: item.title,
            price: item.price,
            image: item.image,
            quantity,
            extra: Map::new(),
        }
    }

    /// Unit price times quantity; an unreadable price contributes zero.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price
            .amount_or_zero()
            .saturating_mul(Decimal::from(self.quantity.get()))
    }
}

/// Numbers and booleans keep their text form; anything else is blank.
fn lenient_title<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    })
}

fn lenient_image<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(path) => Some(path),
        _ => None,
    })
}

/// What [`Cart::add`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was appended.
    Appended,
    /// An existing line's quantity was increased to the given value.
    Merged(Quantity),
}

/// What [`Cart::set_quantity`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantityChange {
    /// No line has that ID.
    Missing,
    /// The line now has this quantity.
    Updated(Quantity),
    /// The requested quantity was zero or less, so the line was removed.
    Removed(LineItem),
}

/// The shopping cart: line items in insertion order, unique by product ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Decode a persisted record.
    ///
    /// The record must be a JSON array. Entries that are not line items (not
    /// an object, or without a usable `id`) are dropped. An entry whose `id`
    /// repeats an earlier one is folded into the earlier line by adding its
    /// quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is not JSON or not an array.
    pub fn decode(raw: &str) -> Result<Self, CartDecodeError> {
        match serde_json::from_str::<Value>(raw)? {
            Value::Array(entries) => Ok(Self::from_entries(entries)),
            _ => Err(CartDecodeError::NotAnArray),
        }
    }

    /// Decode a persisted record, treating anything unreadable as empty.
    ///
    /// ```
    /// use shopcart_core::Cart;
    ///
    /// assert!(Cart::decode_lenient("{not json").is_empty());
    /// assert!(Cart::decode_lenient("{\"id\": \"1\"}").is_empty());
    /// assert_eq!(Cart::decode_lenient(r#"[{"id": "1", "price": "5"}]"#).len(), 1);
    /// ```
    #[must_use]
    pub fn decode_lenient(raw: &str) -> Self {
        Self::decode(raw).unwrap_or_default()
    }

    /// Encode for persistence as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.items)
    }

    fn from_entries(entries: Vec<Value>) -> Self {
        entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value::<LineItem>(entry).ok())
            .collect()
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Iterate over line items in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find the line for a product.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    fn get_mut(&mut self, id: &ProductId) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| &item.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Add a product, merging into an existing line with the same ID.
    ///
    /// A merge keeps the existing line's title, price and image.
    pub fn add(&mut self, item: NewLineItem, quantity: Quantity) -> AddOutcome {
        if let Some(existing) = self.get_mut(&item.id) {
            existing.quantity = existing.quantity.saturating_add(quantity);
            return AddOutcome::Merged(existing.quantity);
        }
        self.items.push(LineItem::new(item, quantity));
        AddOutcome::Appended
    }

    /// Remove the line for a product, returning it if it was present.
    pub fn remove(&mut self, id: &ProductId) -> Option<LineItem> {
        let index = self.items.iter().position(|item| &item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Set a line's quantity. Zero or less removes the line.
    pub fn set_quantity(&mut self, id: &ProductId, count: i64) -> QuantityChange {
        if !self.contains(id) {
            return QuantityChange::Missing;
        }
        let Some(quantity) = Quantity::from_count(count) else {
            return self
                .remove(id)
                .map_or(QuantityChange::Missing, QuantityChange::Removed);
        };
        if let Some(item) = self.get_mut(id) {
            item.quantity = quantity;
        }
        QuantityChange::Updated(quantity)
    }

    /// Sum of price times quantity over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items
            .iter()
            .fold(Decimal::ZERO, |acc, item| acc.saturating_add(item.line_total()))
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<LineItem> for Cart {
    /// Collect lines, folding repeated IDs together like [`Cart::decode`].
    fn from_iter<I: IntoIterator<Item = LineItem>>(iter: I) -> Self {
        let mut cart = Self::new();
        for item in iter {
            match cart.get_mut(&item.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(item.quantity);
                }
                None => cart.items.push(item),
            }
        }
        cart
    }
}

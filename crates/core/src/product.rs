//! Catalog product entries.

use serde::{Deserialize, Serialize};

use crate::cart::NewLineItem;
use crate::types::{Price, ProductId};

/// A product offered in the catalog.
///
/// The cart never owns products; it copies the line-item fields out of one
/// via [`Product::to_line_item`] when the product is added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    #[serde(default)]
    pub category: String,
    /// Listing image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Gallery images for the detail page.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Product {
    /// The listing image, falling back to the first gallery image.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.image
            .as_deref()
            .or_else(|| self.images.first().map(String::as_str))
    }

    /// Extract the fields a cart line carries.
    #[must_use]
    pub fn to_line_item(&self) -> NewLineItem {
        NewLineItem {
            id: self.id.clone(),
            title: self.title.clone(),
            price: self.price.clone(),
            image: self.primary_image().map(str::to_owned),
        }
    }
}

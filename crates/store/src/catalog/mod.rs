//! Read-only product catalog with simple search and filtering.
//!
//! The catalog is loaded once (from a JSON file or the built-in demo data)
//! and never modified by the cart. Searching is a linear scan: a term of at
//! least [`MIN_SEARCH_TERM_LEN`] characters must appear in the title or the
//! description, and a category, when given, must match exactly.

mod demo;

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

use shopcart_core::{Product, ProductId};

/// Shorter search terms do not filter by text.
pub const MIN_SEARCH_TERM_LEN: usize = 2;

/// Category filter value meaning "every category".
pub const ALL_CATEGORIES: &str = "all";

/// Number of related products shown on a product page.
pub const DEFAULT_RELATED_LIMIT: usize = 4;

/// Catalog loading errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Duplicate product id in catalog: {0}")]
    DuplicateId(ProductId),
}

/// A catalog search request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchQuery {
    /// Free-text term matched against titles and descriptions.
    #[serde(default, alias = "q")]
    pub term: String,
    /// Exact category name, or `"all"`.
    #[serde(default)]
    pub category: Option<String>,
}

impl SearchQuery {
    #[must_use]
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            category: None,
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// The trimmed, lowercased term, or `None` if it is too short to filter.
    fn text_filter(&self) -> Option<String> {
        let term = self.term.trim().to_lowercase();
        (term.chars().count() >= MIN_SEARCH_TERM_LEN).then_some(term)
    }

    /// The category to filter by, if any.
    fn category_filter(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|category| !category.is_empty() && *category != ALL_CATEGORIES)
    }

    /// Whether the query filters by anything.
    ///
    /// An inactive query (short term, every category) is not run at all.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.text_filter().is_some() || self.category_filter().is_some()
    }
}

/// The product catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate IDs.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateId` if two products share an ID.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for product in &products {
            if !seen.insert(&product.id) {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
        }
        Ok(Self { products })
    }

    /// The built-in demonstration catalog.
    #[must_use]
    pub fn demo() -> Self {
        Self {
            products: demo::products(),
        }
    }

    /// Parse a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or contains duplicate IDs.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        Self::new(serde_json::from_str(json)?)
    }

    /// Load a JSON array of products from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }

    /// Distinct non-empty category names, sorted.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        self.products
            .iter()
            .map(|product| product.category.as_str())
            .filter(|category| !category.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Products matching a query, in catalog order.
    ///
    /// An inactive query returns nothing.
    #[instrument(skip(self))]
    pub fn search(&self, query: &SearchQuery) -> Vec<&Product> {
        if !query.is_active() {
            return Vec::new();
        }

        let text = query.text_filter();
        let category = query.category_filter();
        let results: Vec<_> = self
            .products
            .iter()
            .filter(|product| {
                text.as_deref().is_none_or(|term| matches_text(product, term))
                    && category.is_none_or(|category| product.category == category)
            })
            .collect();

        debug!(results = results.len(), "Catalog search");
        results
    }

    /// Up to `limit` other products, in catalog order.
    #[must_use]
    pub fn related(&self, id: &ProductId, limit: usize) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| &product.id != id)
            .take(limit)
            .collect()
    }
}

fn matches_text(product: &Product, term: &str) -> bool {
    product.title.to_lowercase().contains(term) || product.description.to_lowercase().contains(term)
}

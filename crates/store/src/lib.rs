//! Shopcart Store - the persisted cart and the product catalog.
//!
//! [`CartStore`] is the single source of truth for a cart. Every operation
//! reads the whole persisted record, applies one change with the pure
//! [`Cart`](shopcart_core::Cart) operations, writes the whole record back, and
//! then notifies any registered [`CartListener`]s.
//!
//! The persisted record lives in a [`CartStorage`] backend, injected at
//! construction:
//!
//! - [`MemoryStorage`] - process-local map, used by tests and the HTTP server
//! - [`FileStorage`] - one JSON file per record key
//!
//! ```
//! use shopcart_core::{ProductId, Quantity};
//! use shopcart_store::{Catalog, CartStore, MemoryStorage};
//!
//! # fn main() -> Result<(), shopcart_store::StoreError> {
//! let catalog = Catalog::demo();
//! let store = CartStore::new(MemoryStorage::new());
//!
//! let gamepad = catalog.get(&ProductId::new("1")).map(|p| p.to_line_item());
//! if let Some(item) = gamepad {
//!     store.add_item(item, Quantity::ONE)?;
//! }
//! assert_eq!(store.item_count(), 1);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod error;
pub mod events;
pub mod storage;
pub mod store;
pub mod summary;

pub use catalog::{
    ALL_CATEGORIES, Catalog, CatalogError, DEFAULT_RELATED_LIMIT, MIN_SEARCH_TERM_LEN, SearchQuery,
};
pub use error::{Result, StoreError};
pub use events::{CartEvent, CartListener, RecordingListener};
pub use storage::{CartStorage, FileStorage, MemoryStorage, StorageError};
pub use store::{CartStore, DEFAULT_CART_KEY};
pub use summary::{CartSummary, ShippingPolicy, format_money};

//! Shopcart Core - Shared cart and catalog types.
//!
//! This crate provides the types used across all Shopcart components:
//! - `store` - Cart store over a key-value backend, plus the product catalog
//! - `storefront` - JSON HTTP API over the store
//! - `cli` - Command-line client for a file-backed cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure state transitions - no I/O, no
//! logging, no storage access. Every cart mutation here is a plain function
//! over an in-memory [`Cart`], which is what makes the store testable with any
//! backing storage substituted in.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices, and quantities
//! - [`cart`] - Line items and the cart collection
//! - [`product`] - Catalog product entries

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod product;
pub mod types;

pub use cart::{AddOutcome, Cart, CartDecodeError, LineItem, NewLineItem, QuantityChange};
pub use product::Product;
pub use types::*;

//! Core types for Shopcart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod coerce;
pub mod id;
pub mod price;
pub mod quantity;

pub use coerce::{parse_float_prefix, parse_int_prefix};
pub use id::ProductId;
pub use price::Price;
pub use quantity::Quantity;

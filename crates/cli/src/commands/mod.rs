//! CLI command implementations.
//!
//! Commands write their output to a caller-supplied writer and log progress
//! with `tracing`.

pub mod cart;
pub mod products;

use thiserror::Error;

use shopcart_core::ProductId;

/// Command failures that are not storage or I/O errors.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Unknown product: {0}")]
    UnknownProduct(ProductId),
}

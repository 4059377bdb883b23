//! Error types for order persistence.

use thiserror::Error;

use crate::order::OrderId;

/// Failure of an order store operation. Nothing is committed when one is returned.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("order {0} not found")]
    NotFound(OrderId),

    #[error("order store unavailable: {0}")]
    Unavailable(String),

    #[error("order store i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("order store is corrupt: {0}")]
    Serde(#[from] serde_json::Error),
}

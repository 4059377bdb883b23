//! Error types for the shopping session.

use thiserror::Error;

use crate::checkout::ValidationError;
use crate::repository::RepositoryError;
use crate::sizing::SizingError;

/// Why a [`ShopEvent`](super::ShopEvent) was not applied.
///
/// The session state is left exactly as it was before the event.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("order not ready: {0}")]
    Validation(#[from] ValidationError),

    #[error("size selection rejected: {0}")]
    Sizing(#[from] SizingError),

    #[error("order could not be saved: {0}")]
    Persistence(#[from] RepositoryError),

    #[error("order already placed, start over to shop again")]
    OrderComplete,

    #[error("submitting requires an order store")]
    SubmitNeedsStore,
}

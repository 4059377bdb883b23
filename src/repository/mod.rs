//! Order persistence boundary.
//!
//! The shop only needs three operations from its order store: list, create and
//! a partial update. Callers receive the store as a generic parameter so tests
//! can substitute [`InMemoryRepository`].

use async_trait::async_trait;

use crate::order::{NewOrder, Order, OrderId, OrderUpdate};

mod error;
pub use error::RepositoryError;

mod file;
pub use file::JsonFileRepository;

mod memory;
pub use memory::InMemoryRepository;

/// Ordering of [`OrderRepository::list`] results by creation date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    CreatedAsc,
    /// Newest first.
    #[default]
    CreatedDesc,
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// All orders, sorted by creation date.
    async fn list(&self, sort: SortOrder) -> Result<Vec<Order>, RepositoryError>;

    /// Persist a new order, assigning its id and creation date.
    async fn create(&self, order: NewOrder) -> Result<Order, RepositoryError>;

    /// Apply a partial update to an existing order.
    async fn update(&self, id: &OrderId, update: OrderUpdate) -> Result<Order, RepositoryError>;
}

#[async_trait]
impl<R: OrderRepository + ?Sized> OrderRepository for &R {
    async fn list(&self, sort: SortOrder) -> Result<Vec<Order>, RepositoryError> {
        (**self).list(sort).await
    }

    async fn create(&self, order: NewOrder) -> Result<Order, RepositoryError> {
        (**self).create(order).await
    }

    async fn update(&self, id: &OrderId, update: OrderUpdate) -> Result<Order, RepositoryError> {
        (**self).update(id, update).await
    }
}

/// Stable sort, so orders created in the same instant keep insertion order
/// (reversed for `CreatedDesc`).
fn sort_orders(orders: &mut [Order], sort: SortOrder) {
    orders.sort_by_key(|order| order.created_date);
    if sort == SortOrder::CreatedDesc {
        orders.reverse();
    }
}

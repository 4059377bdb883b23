use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use super::{OrderRepository, RepositoryError, SortOrder, sort_orders};
use crate::order::{NewOrder, Order, OrderId, OrderUpdate};

#[derive(Debug, Default)]
struct Store {
    orders: Vec<Order>,
    next_id: u64,
}

/// Process-local order store with sequential ids.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    store: RwLock<Store>,
    /// When set, every operation fails as if the backend were down.
    unavailable: AtomicBool,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store; new ids continue after the largest numeric id present.
    pub fn with_orders(orders: Vec<Order>) -> Self {
        let next_id = orders
            .iter()
            .filter_map(|order| order.id.0.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self {
            store: RwLock::new(Store { orders, next_id }),
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.orders.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn check_available(&self) -> Result<(), RepositoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable(
                "in-memory store switched off".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for InMemoryRepository {
    async fn list(&self, sort: SortOrder) -> Result<Vec<Order>, RepositoryError> {
        self.check_available()?;
        let mut orders = self.store.read().await.orders.clone();
        sort_orders(&mut orders, sort);
        Ok(orders)
    }

    async fn create(&self, order: NewOrder) -> Result<Order, RepositoryError> {
        self.check_available()?;
        let mut store = self.store.write().await;
        store.next_id += 1;
        let order = Order::from_new(OrderId(store.next_id.to_string()), Utc::now(), order);
        store.orders.push(order.clone());
        Ok(order)
    }

    async fn update(&self, id: &OrderId, update: OrderUpdate) -> Result<Order, RepositoryError> {
        self.check_available()?;
        let mut store = self.store.write().await;
        let order = store
            .orders
            .iter_mut()
            .find(|order| &order.id == id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        update.apply_to(order);
        Ok(order.clone())
    }
}

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::debug;

use super::{OrderRepository, RepositoryError, SortOrder, sort_orders};
use crate::order::{NewOrder, Order, OrderId, OrderUpdate};

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    next_id: u64,
    orders: Vec<Order>,
}

/// Order store kept in a single JSON document.
///
/// The whole file is read and rewritten on every operation. A missing file is
/// an empty store. Writes go to a sibling `.tmp` file that is renamed over the
/// store, so a failed write leaves the previous contents in place.
#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<StoreFile, RepositoryError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(StoreFile::default()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "order store missing, starting empty");
                Ok(StoreFile::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    async fn save(&self, store: &StoreFile) -> Result<(), RepositoryError> {
        let content = serde_json::to_string_pretty(store)?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, content).await?;
        tokio::fs::rename(&temp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for JsonFileRepository {
    async fn list(&self, sort: SortOrder) -> Result<Vec<Order>, RepositoryError> {
        let _guard = self.lock.lock().await;
        let mut orders = self.load().await?.orders;
        sort_orders(&mut orders, sort);
        Ok(orders)
    }

    async fn create(&self, order: NewOrder) -> Result<Order, RepositoryError> {
        let _guard = self.lock.lock().await;
        let mut store = self.load().await?;
        store.next_id += 1;
        let order = Order::from_new(OrderId(store.next_id.to_string()), Utc::now(), order);
        store.orders.push(order.clone());
        self.save(&store).await?;
        Ok(order)
    }

    async fn update(&self, id: &OrderId, update: OrderUpdate) -> Result<Order, RepositoryError> {
        let _guard = self.lock.lock().await;
        let mut store = self.load().await?;
        let order = store
            .orders
            .iter_mut()
            .find(|order| &order.id == id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        update.apply_to(order);
        let updated = order.clone();
        self.save(&store).await?;
        Ok(updated)
    }
}

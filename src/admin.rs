//! Order management for shop administrators.

use serde::Serialize;
use std::collections::HashSet;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::Amount;
use crate::order::{Order, OrderId, OrderStatus, OrderUpdate, UnknownStatus};
use crate::repository::{OrderRepository, RepositoryError, SortOrder};

/// Column headers of the CSV export, in output order.
pub const EXPORT_HEADERS: [&str; 10] = [
    "Order ID",
    "Date",
    "Customer Name",
    "Customer Email",
    "Items",
    "Subtotal",
    "Setup Fee",
    "Total",
    "Status",
    "Notes",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush csv buffer: {0}")]
    Flush(String),
    #[error("csv output is not utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Status selector of the order table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

impl FromStr for StatusFilter {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(StatusFilter::All),
            other => other.parse().map(StatusFilter::Only),
        }
    }
}

/// Dashboard metrics over a list of orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderSummary {
    pub total_orders: usize,
    pub total_revenue: Amount,
    pub pending_count: usize,
    pub unique_customer_count: usize,
}

pub fn filter_by_status(orders: &[Order], filter: StatusFilter) -> Vec<&Order> {
    orders
        .iter()
        .filter(|order| match filter {
            StatusFilter::All => true,
            StatusFilter::Only(status) => order.status == status,
        })
        .collect()
}

pub fn aggregate(orders: &[Order]) -> OrderSummary {
    let customers: HashSet<&str> = orders
        .iter()
        .map(|order| order.customer_email.as_str())
        .collect();

    OrderSummary {
        total_orders: orders.len(),
        total_revenue: orders.iter().map(|order| order.total_amount).sum(),
        pending_count: orders
            .iter()
            .filter(|order| order.status == OrderStatus::Pending)
            .count(),
        unique_customer_count: customers.len(),
    }
}

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    id: &'a str,
    date: String,
    customer_name: &'a str,
    customer_email: &'a str,
    items: String,
    subtotal: String,
    setup_fee: String,
    total: String,
    status: &'static str,
    notes: &'a str,
}

impl<'a> From<&'a Order> for ExportRow<'a> {
    fn from(order: &'a Order) -> Self {
        let items = order
            .items
            .iter()
            .map(|item| format!("{} ({})", item.name, item.quantity))
            .collect::<Vec<_>>()
            .join("; ");

        Self {
            id: &order.id.0,
            date: order.created_date.format("%Y-%m-%d").to_string(),
            customer_name: &order.customer_name,
            customer_email: &order.customer_email,
            items,
            subtotal: order.subtotal.to_string(),
            setup_fee: order.setup_fee.to_string(),
            total: order.total_amount.to_string(),
            status: order.status.as_str(),
            notes: order.notes.as_deref().unwrap_or(""),
        }
    }
}

/// Render orders as CSV: a plain header row, then one fully quoted row per order.
pub fn export_csv(orders: &[Order]) -> Result<String, ExportError> {
    let mut header = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    header.write_record(EXPORT_HEADERS)?;
    let buffer = header
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(buffer);
    for order in orders {
        writer.serialize(ExportRow::from(order))?;
    }
    let buffer = writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))?;

    Ok(String::from_utf8(buffer)?)
}

/// The admin order page: the last loaded order list plus the store behind it.
pub struct AdminView<R> {
    repo: R,
    orders: Vec<Order>,
}

impl<R: OrderRepository> AdminView<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            orders: Vec::new(),
        }
    }

    /// Reload every order, newest first.
    ///
    /// On failure the previously loaded list is kept.
    pub async fn load(&mut self) -> Result<(), RepositoryError> {
        match self.repo.list(SortOrder::CreatedDesc).await {
            Ok(orders) => {
                info!(count = orders.len(), "orders loaded");
                self.orders = orders;
                Ok(())
            }
            Err(e) => {
                warn!(reason = %e, "failed to load orders");
                Err(e)
            }
        }
    }

    /// Change an order's status, then reload the whole list.
    ///
    /// The local list is never patched in place: whatever the store holds
    /// after the update attempt is what the view shows.
    pub async fn update_status(
        &mut self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let result = self.repo.update(id, OrderUpdate::status(status)).await;
        match &result {
            Ok(order) => info!(order = %order.id, status = %order.status, "order status updated"),
            Err(e) => warn!(order = %id, reason = %e, "failed to update order status"),
        }
        if let Err(e) = self.load().await {
            debug!(reason = %e, "reload after status update failed");
        }
        result
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn filtered(&self, filter: StatusFilter) -> Vec<&Order> {
        filter_by_status(&self.orders, filter)
    }

    pub fn summary(&self) -> OrderSummary {
        aggregate(&self.orders)
    }

    pub fn find(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| &order.id == id)
    }

    /// Export the loaded orders that pass `filter`.
    pub fn export_csv(&self, filter: StatusFilter) -> Result<String, ExportError> {
        let orders: Vec<Order> = self.filtered(filter).into_iter().cloned().collect();
        export_csv(&orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{NewOrder, OrderItem};
    use crate::repository::InMemoryRepository;
    use chrono::{TimeZone, Utc};

    fn order(id: &str, email: &str, total: f64, status: OrderStatus) -> Order {
        Order {
            id: OrderId::from(id),
            created_date: Utc.with_ymd_and_hms(2024, 1, 5, 14, 30, 0).unwrap(),
            customer_name: "Jane".to_string(),
            customer_email: email.to_string(),
            notes: None,
            items: Vec::new(),
            subtotal: Amount::from_float(total - 1.25),
            setup_fee: Amount::from_float(1.25),
            total_amount: Amount::from_float(total),
            status,
        }
    }

    fn new_order(email: &str) -> NewOrder {
        NewOrder {
            customer_name: "Sam".to_string(),
            customer_email: email.to_string(),
            notes: None,
            items: Vec::new(),
            subtotal: Amount::from_float(8.44),
            setup_fee: Amount::from_float(1.25),
            total_amount: Amount::from_float(9.69),
            status: OrderStatus::Pending,
        }
    }

    #[test]
    fn filter_all_is_identity() {
        let orders = vec![
            order("1", "a@x.com", 10.0, OrderStatus::Pending),
            order("2", "b@x.com", 20.0, OrderStatus::Completed),
        ];
        assert_eq!(filter_by_status(&orders, StatusFilter::All).len(), 2);

        let completed = filter_by_status(&orders, StatusFilter::Only(OrderStatus::Completed));
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].id, OrderId::from("2"));
    }

    #[test]
    fn status_filter_parses() {
        assert_eq!("all".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!(
            "processing".parse::<StatusFilter>(),
            Ok(StatusFilter::Only(OrderStatus::Processing))
        );
        assert!("cancelled".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn aggregate_over_no_orders_is_zero() {
        assert_eq!(aggregate(&[]), OrderSummary::default());
    }

    #[test]
    fn aggregate_counts_distinct_customers() {
        let orders = vec![
            order("1", "a@x.com", 10.0, OrderStatus::Pending),
            order("2", "a@x.com", 20.5, OrderStatus::Processing),
            order("3", "b@x.com", 5.25, OrderStatus::Pending),
        ];
        let summary = aggregate(&orders);
        assert_eq!(summary.total_orders, 3);
        assert_eq!(summary.total_revenue, Amount::from_float(35.75));
        assert_eq!(summary.pending_count, 2);
        assert_eq!(summary.unique_customer_count, 2);
    }

    #[test]
    fn export_single_order() {
        let mut order = order("1", "j@x.com", 18.13, OrderStatus::Pending);
        order.items = vec![OrderItem {
            name: "T-shirts".to_string(),
            price: Amount::from_float(8.44),
            quantity: 2,
            sizes: Vec::new(),
            total: Amount::from_float(16.88),
        }];

        let csv = export_csv(&[order]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "Order ID,Date,Customer Name,Customer Email,Items,Subtotal,Setup Fee,Total,Status,Notes"
        );
        assert_eq!(
            lines[1],
            r#""1","2024-01-05","Jane","j@x.com","T-shirts (2)","16.88","1.25","18.13","pending","""#
        );
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn export_joins_items_and_escapes_quotes() {
        let mut order = order("7", "j@x.com", 10.0, OrderStatus::Completed);
        order.notes = Some("say \"hi\"".to_string());
        order.items = ["Hoodies", "Stickers"]
            .into_iter()
            .map(|name| OrderItem {
                name: name.to_string(),
                price: Amount::ZERO,
                quantity: 1,
                sizes: Vec::new(),
                total: Amount::ZERO,
            })
            .collect();

        let csv = export_csv(&[order]).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert!(row.contains(r#""Hoodies (1); Stickers (1)""#));
        assert!(row.ends_with(r#""say ""hi""""#));
    }

    #[test]
    fn export_of_no_orders_is_header_only() {
        let csv = export_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[tokio::test]
    async fn update_status_reloads_from_store() {
        let repo = InMemoryRepository::new();
        let created = repo.create(new_order("a@x.com")).await.unwrap();
        let mut view = AdminView::new(&repo);
        view.load().await.unwrap();

        view.update_status(&created.id, OrderStatus::Processing)
            .await
            .unwrap();

        assert_eq!(
            view.find(&created.id).map(|o| o.status),
            Some(OrderStatus::Processing)
        );
        assert_eq!(view.summary().pending_count, 0);
    }

    #[tokio::test]
    async fn failed_update_still_reloads() {
        let repo = InMemoryRepository::new();
        let mut view = AdminView::new(&repo);
        view.load().await.unwrap();
        assert!(view.orders().is_empty());

        // an order arrives from the shop after the page was loaded
        repo.create(new_order("b@x.com")).await.unwrap();

        let result = view
            .update_status(&OrderId::from("99"), OrderStatus::Completed)
            .await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
        assert_eq!(view.orders().len(), 1);
    }

    #[tokio::test]
    async fn failed_load_keeps_previous_list() {
        let repo = InMemoryRepository::new();
        repo.create(new_order("a@x.com")).await.unwrap();
        let mut view = AdminView::new(&repo);
        view.load().await.unwrap();

        repo.set_unavailable(true);
        assert!(view.load().await.is_err());
        assert_eq!(view.orders().len(), 1);
    }

    #[tokio::test]
    async fn update_against_unavailable_store_keeps_list() {
        let repo = InMemoryRepository::new();
        let created = repo.create(new_order("a@x.com")).await.unwrap();
        let mut view = AdminView::new(&repo);
        view.load().await.unwrap();

        repo.set_unavailable(true);
        let result = view.update_status(&created.id, OrderStatus::Completed).await;
        assert!(matches!(result, Err(RepositoryError::Unavailable(_))));
        assert_eq!(
            view.find(&created.id).map(|o| o.status),
            Some(OrderStatus::Pending)
        );
    }

    #[tokio::test]
    async fn view_export_applies_filter() {
        let repo = InMemoryRepository::new();
        let first = repo.create(new_order("a@x.com")).await.unwrap();
        repo.create(new_order("b@x.com")).await.unwrap();
        let mut view = AdminView::new(&repo);
        view.update_status(&first.id, OrderStatus::Completed)
            .await
            .unwrap();

        let completed = view
            .export_csv(StatusFilter::Only(OrderStatus::Completed))
            .unwrap();
        let rows: Vec<&str> = completed.lines().skip(1).collect();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].contains(r#""a@x.com""#));

        let all = view.export_csv(StatusFilter::All).unwrap();
        assert_eq!(all.lines().count(), 3);
    }
}

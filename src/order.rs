//! Order records and their assembly from a checkout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::Amount;
use crate::cart::{Cart, compute_setup_fee, compute_total};
use crate::catalog::{Size, price_of};
use crate::checkout::CustomerInfo;
use crate::sizing::SizeAssignment;

/// Order identifier, assigned by the order store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for OrderId {
    fn from(value: &str) -> Self {
        OrderId(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown order status '{0}'")]
pub struct UnknownStatus(pub String);

/// Fulfilment state. Orders are created `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Completed,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "completed" => Ok(OrderStatus::Completed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// One product line of an order, priced at submission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub price: Amount,
    pub quantity: u32,
    /// One size per unit; empty for non-clothing.
    #[serde(default)]
    pub sizes: Vec<Size>,
    pub total: Amount,
}

/// Payload handed to the order store's `create`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_email: String,
    pub notes: Option<String>,
    pub items: Vec<OrderItem>,
    pub subtotal: Amount,
    pub setup_fee: Amount,
    pub total_amount: Amount,
    pub status: OrderStatus,
}

/// A persisted order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub created_date: DateTime<Utc>,
    pub customer_name: String,
    pub customer_email: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub items: Vec<OrderItem>,
    pub subtotal: Amount,
    pub setup_fee: Amount,
    pub total_amount: Amount,
    pub status: OrderStatus,
}

impl Order {
    pub fn from_new(id: OrderId, created_date: DateTime<Utc>, new: NewOrder) -> Self {
        Self {
            id,
            created_date,
            customer_name: new.customer_name,
            customer_email: new.customer_email,
            notes: new.notes,
            items: new.items,
            subtotal: new.subtotal,
            setup_fee: new.setup_fee,
            total_amount: new.total_amount,
            status: new.status,
        }
    }
}

/// Partial update accepted by the order store; `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
}

impl OrderUpdate {
    pub fn status(status: OrderStatus) -> Self {
        Self {
            status: Some(status),
        }
    }

    pub fn apply_to(&self, order: &mut Order) {
        if let Some(status) = self.status {
            order.status = status;
        }
    }
}

/// Assemble a pending order from the current checkout state.
///
/// Prices are looked up here rather than carried over from the cart view.
pub fn build_order(cart: &Cart, sizes: &SizeAssignment, customer: &CustomerInfo) -> NewOrder {
    let items: Vec<OrderItem> = cart
        .line_items()
        .map(|(product, quantity)| {
            let price = price_of(product.name());
            OrderItem {
                name: product.name().to_string(),
                price,
                quantity,
                sizes: sizes
                    .sizes_for(product)
                    .map(|slots| slots.iter().flatten().copied().collect())
                    .unwrap_or_default(),
                total: price * quantity,
            }
        })
        .collect();

    let subtotal: Amount = items.iter().map(|item| item.total).sum();
    let setup_fee = compute_setup_fee(subtotal);
    let notes = customer.notes.trim();

    NewOrder {
        customer_name: customer.customer_name.trim().to_string(),
        customer_email: customer.customer_email.trim().to_string(),
        notes: (!notes.is_empty()).then(|| notes.to_string()),
        items,
        subtotal,
        setup_fee,
        total_amount: compute_total(subtotal, setup_fee),
        status: OrderStatus::Pending,
    }
}

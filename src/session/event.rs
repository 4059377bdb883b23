use crate::catalog::{Product, Size};

/// A user interaction with the shop page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShopEvent {
    SetQuantity { product: Product, quantity: u32 },
    Increment(Product),
    /// Saturates at zero.
    Decrement(Product),
    SetSize {
        product: Product,
        index: usize,
        size: Size,
    },
    SetName(String),
    SetEmail(String),
    SetNotes(String),
    Submit,
    /// Leave the confirmation screen for a fresh cart.
    StartOver,
}

impl ShopEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            ShopEvent::SetQuantity { .. } => "quantity",
            ShopEvent::Increment(_) => "increment",
            ShopEvent::Decrement(_) => "decrement",
            ShopEvent::SetSize { .. } => "size",
            ShopEvent::SetName(_) => "customer_name",
            ShopEvent::SetEmail(_) => "customer_email",
            ShopEvent::SetNotes(_) => "notes",
            ShopEvent::Submit => "submit",
            ShopEvent::StartOver => "start_over",
        }
    }
}

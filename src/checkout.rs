//! Gatekeeping for order submission.

use thiserror::Error;

use crate::cart::Cart;
use crate::catalog::Product;
use crate::sizing::SizeAssignment;

/// Why an order cannot be placed yet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("cart is empty")]
    EmptyCart,
    #[error("customer name is required")]
    MissingName,
    #[error("customer email is required")]
    MissingEmail,
    #[error("sizes missing for {0}")]
    MissingSizes(Product),
}

/// Contact details collected on the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerInfo {
    pub customer_name: String,
    pub customer_email: String,
    pub notes: String,
}

impl CustomerInfo {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            customer_name: name.into(),
            customer_email: email.into(),
            notes: String::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

/// Every assigned product has one filled slot per unit in the cart.
///
/// A stale assignment whose slot count disagrees with the cart fails.
pub fn all_sizes_selected(cart: &Cart, sizes: &SizeAssignment) -> bool {
    first_missing_sizes(cart, sizes).is_none()
}

fn first_missing_sizes(cart: &Cart, sizes: &SizeAssignment) -> Option<Product> {
    sizes
        .iter()
        .find(|(product, slots)| {
            slots.len() != cart.quantity(*product) as usize || slots.iter().any(Option::is_none)
        })
        .map(|(product, _)| product)
}

/// First reason the order cannot be submitted, if any.
pub fn validate(
    customer: &CustomerInfo,
    cart: &Cart,
    sizes: &SizeAssignment,
) -> Result<(), ValidationError> {
    if cart.is_empty() {
        return Err(ValidationError::EmptyCart);
    }
    if customer.customer_name.trim().is_empty() {
        return Err(ValidationError::MissingName);
    }
    if customer.customer_email.trim().is_empty() {
        return Err(ValidationError::MissingEmail);
    }
    if let Some(product) = first_missing_sizes(cart, sizes) {
        return Err(ValidationError::MissingSizes(product));
    }
    Ok(())
}

pub fn is_order_valid(customer: &CustomerInfo, cart: &Cart, sizes: &SizeAssignment) -> bool {
    validate(customer, cart, sizes).is_ok()
}

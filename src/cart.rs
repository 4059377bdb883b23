//! In-progress product selection and its pricing.

use std::collections::BTreeMap;

use crate::Amount;
use crate::catalog::Product;

/// Flat per-order screen setup charge.
pub const SETUP_FEE: Amount = Amount::from_cents(125);

/// Quantity per catalog product.
///
/// Every product always has an entry; a quantity of zero means "not selected".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    quantities: BTreeMap<Product, u32>,
}

impl Cart {
    pub fn new() -> Self {
        Self {
            quantities: Product::ALL.into_iter().map(|p| (p, 0)).collect(),
        }
    }

    pub fn quantity(&self, product: Product) -> u32 {
        self.quantities.get(&product).copied().unwrap_or(0)
    }

    pub fn set_quantity(&mut self, product: Product, quantity: u32) {
        self.quantities.insert(product, quantity);
    }

    pub fn increment(&mut self, product: Product) {
        let quantity = self.quantity(product).saturating_add(1);
        self.set_quantity(product, quantity);
    }

    /// Never goes below zero.
    pub fn decrement(&mut self, product: Product) {
        let quantity = self.quantity(product).saturating_sub(1);
        self.set_quantity(product, quantity);
    }

    /// All entries in catalog order, including unselected ones.
    pub fn entries(&self) -> impl Iterator<Item = (Product, u32)> + '_ {
        self.quantities.iter().map(|(p, q)| (*p, *q))
    }

    /// Products with a non-zero quantity, in catalog order.
    pub fn line_items(&self) -> impl Iterator<Item = (Product, u32)> + '_ {
        self.entries().filter(|(_, quantity)| *quantity > 0)
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.values().all(|q| *q == 0)
    }

    pub fn clear(&mut self) {
        *self = Cart::new();
    }

    pub fn subtotal(&self) -> Amount {
        compute_subtotal(self)
    }

    pub fn setup_fee(&self) -> Amount {
        compute_setup_fee(self.subtotal())
    }

    pub fn total(&self) -> Amount {
        let subtotal = self.subtotal();
        compute_total(subtotal, compute_setup_fee(subtotal))
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

pub fn compute_subtotal(cart: &Cart) -> Amount {
    cart.entries()
        .map(|(product, quantity)| product.price() * quantity)
        .sum()
}

/// Charged once per order, only when something billable is in the cart.
pub fn compute_setup_fee(subtotal: Amount) -> Amount {
    if subtotal > Amount::ZERO {
        SETUP_FEE
    } else {
        Amount::ZERO
    }
}

pub fn compute_total(subtotal: Amount, setup_fee: Amount) -> Amount {
    subtotal + setup_fee
}

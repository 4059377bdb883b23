//! Per-unit garment size selections.

use std::collections::BTreeMap;
use thiserror::Error;

use crate::cart::Cart;
use crate::catalog::{Product, Size};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizingError {
    #[error("{0} has no size slots")]
    NotAssigned(Product),
    #[error("{product} has {len} size slots, index {index} is out of range")]
    SlotOutOfRange {
        product: Product,
        index: usize,
        len: usize,
    },
}

/// One slot per unit of each in-cart clothing product. `None` is unselected.
///
/// Clothing at quantity zero and non-clothing products have no entry at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeAssignment {
    slots: BTreeMap<Product, Vec<Option<Size>>>,
}

impl SizeAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the assignment for the current cart.
    ///
    /// Slots that survive keep their selection; new slots start empty and
    /// trailing slots past the quantity are dropped.
    pub fn reconcile(cart: &Cart, previous: &SizeAssignment) -> SizeAssignment {
        let slots = cart
            .line_items()
            .filter(|(product, _)| product.is_clothing())
            .map(|(product, quantity)| {
                let existing = previous.sizes_for(product).unwrap_or_default();
                let sizes = (0..quantity as usize)
                    .map(|i| existing.get(i).copied().flatten())
                    .collect();
                (product, sizes)
            })
            .collect();
        SizeAssignment { slots }
    }

    pub fn set_size(
        &mut self,
        product: Product,
        index: usize,
        size: Size,
    ) -> Result<(), SizingError> {
        let sizes = self
            .slots
            .get_mut(&product)
            .ok_or(SizingError::NotAssigned(product))?;
        let len = sizes.len();
        let slot = sizes.get_mut(index).ok_or(SizingError::SlotOutOfRange {
            product,
            index,
            len,
        })?;
        *slot = Some(size);
        Ok(())
    }

    pub fn sizes_for(&self, product: Product) -> Option<&[Option<Size>]> {
        self.slots.get(&product).map(Vec::as_slice)
    }

    /// The chosen sizes, only once every slot of `product` is filled.
    pub fn selected_sizes(&self, product: Product) -> Option<Vec<Size>> {
        self.sizes_for(product)?.iter().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Product, &[Option<Size>])> + '_ {
        self.slots.iter().map(|(p, s)| (*p, s.as_slice()))
    }

    pub fn contains(&self, product: Product) -> bool {
        self.slots.contains_key(&product)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

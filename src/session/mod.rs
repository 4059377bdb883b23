//! Shopping session state.
//!
//! A session owns the cart, the garment size selections and the checkout form.
//! User interactions arrive as [`ShopEvent`]s; every quantity change re-runs the
//! size reconciliation so the size slots always match the cart. Also supports an
//! async stream of events.

use tokio_stream::{Stream, StreamExt};
use tracing::{info, warn};

use crate::Amount;
use crate::cart::Cart;
use crate::catalog::Product;
use crate::checkout::{self, CustomerInfo};
use crate::order::{Order, build_order};
use crate::repository::OrderRepository;
use crate::sizing::SizeAssignment;

mod error;
pub use error::SessionError;

mod event;
pub use event::ShopEvent;

/// Where the shopper is in the flow.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Phase {
    #[default]
    Shopping,
    /// Confirmation screen for the order just placed.
    Complete(Order),
}

#[derive(Debug, Default)]
pub struct Session {
    cart: Cart,
    sizes: SizeAssignment,
    customer: CustomerInfo,
    submitting: bool,
    phase: Phase,
}

/// Public API
impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn sizes(&self) -> &SizeAssignment {
        &self.sizes
    }

    pub fn customer(&self) -> &CustomerInfo {
        &self.customer
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// The checkout form is only shown once something is in the cart.
    pub fn checkout_visible(&self) -> bool {
        matches!(self.phase, Phase::Shopping) && !self.cart.is_empty()
    }

    pub fn subtotal(&self) -> Amount {
        self.cart.subtotal()
    }

    pub fn setup_fee(&self) -> Amount {
        self.cart.setup_fee()
    }

    pub fn total(&self) -> Amount {
        self.cart.total()
    }

    pub fn can_submit(&self) -> bool {
        !self.submitting
            && self.checkout_visible()
            && checkout::is_order_valid(&self.customer, &self.cart, &self.sizes)
    }

    /// Apply a single non-submitting event on top of the current state.
    pub fn apply(&mut self, event: ShopEvent) -> Result<(), SessionError> {
        let kind = event.kind();
        let result = self.apply_edit(event);
        Self::log_result(kind, &result);
        result
    }

    /// Validate the checkout, hand the order to `repo` and reset on success.
    ///
    /// On any failure the cart, sizes and form are left untouched so the
    /// shopper can retry.
    pub async fn submit<R: OrderRepository>(&mut self, repo: &R) -> Result<Order, SessionError> {
        if matches!(self.phase, Phase::Complete(_)) {
            return Err(SessionError::OrderComplete);
        }
        if let Err(e) = checkout::validate(&self.customer, &self.cart, &self.sizes) {
            warn!(reason = %e, "order not ready for submission");
            return Err(e.into());
        }

        let new_order = build_order(&self.cart, &self.sizes, &self.customer);
        self.submitting = true;
        let result = repo.create(new_order).await;
        self.submitting = false;

        match result {
            Ok(order) => {
                info!(
                    order = %order.id,
                    customer = %order.customer_email,
                    total = %order.total_amount,
                    "order placed"
                );
                self.cart.clear();
                self.sizes.clear();
                self.customer = CustomerInfo::default();
                self.phase = Phase::Complete(order.clone());
                Ok(order)
            }
            Err(e) => {
                warn!(reason = %e, "order submission failed");
                Err(e.into())
            }
        }
    }

    /// Route any event, including `Submit`.
    pub async fn handle<R: OrderRepository>(
        &mut self,
        event: ShopEvent,
        repo: &R,
    ) -> Result<Option<Order>, SessionError> {
        match event {
            ShopEvent::Submit => self.submit(repo).await.map(Some),
            other => self.apply(other).map(|()| None),
        }
    }

    /// Run the session over a stream of events, returning the orders placed.
    pub async fn run<R: OrderRepository>(
        &mut self,
        mut stream: impl Stream<Item = ShopEvent> + Unpin,
        repo: &R,
    ) -> Vec<Order> {
        let mut placed = Vec::new();
        while let Some(event) = stream.next().await {
            // a rejected event never ends the session
            if let Ok(Some(order)) = self.handle(event, repo).await {
                placed.push(order);
            }
        }
        placed
    }
}

/// Private API
impl Session {
    fn log_result(kind: &str, result: &Result<(), SessionError>) {
        match result {
            Ok(()) => info!(event = kind, "event applied"),
            Err(e) => warn!(event = kind, reason = %e, "event rejected"),
        }
    }

    fn apply_edit(&mut self, event: ShopEvent) -> Result<(), SessionError> {
        match event {
            ShopEvent::StartOver => self.phase = Phase::Shopping,
            _ if matches!(self.phase, Phase::Complete(_)) => {
                return Err(SessionError::OrderComplete);
            }
            ShopEvent::SetQuantity { product, quantity } => {
                self.change_quantity(product, |cart| cart.set_quantity(product, quantity))
            }
            ShopEvent::Increment(product) => {
                self.change_quantity(product, |cart| cart.increment(product))
            }
            ShopEvent::Decrement(product) => {
                self.change_quantity(product, |cart| cart.decrement(product))
            }
            ShopEvent::SetSize {
                product,
                index,
                size,
            } => self.sizes.set_size(product, index, size)?,
            ShopEvent::SetName(name) => self.customer.customer_name = name,
            ShopEvent::SetEmail(email) => self.customer.customer_email = email,
            ShopEvent::SetNotes(notes) => self.customer.notes = notes,
            ShopEvent::Submit => return Err(SessionError::SubmitNeedsStore),
        }
        Ok(())
    }

    fn change_quantity(&mut self, product: Product, change: impl FnOnce(&mut Cart)) {
        change(&mut self.cart);
        self.sizes = SizeAssignment::reconcile(&self.cart, &self.sizes);
        info!(
            product = %product,
            quantity = self.cart.quantity(product),
            subtotal = %self.cart.subtotal(),
            "quantity changed"
        );
    }
}

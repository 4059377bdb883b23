pub mod admin;
pub mod amount;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod csv;
pub mod order;
pub mod repository;
pub mod session;
pub mod sizing;

pub use amount::Amount;
pub use cart::Cart;
pub use catalog::{Product, Size};
pub use order::{Order, OrderId, OrderStatus};
pub use repository::OrderRepository;
pub use session::{Session, ShopEvent};

//! Domain models shared across routes, services, and storage.

pub mod order;

pub use order::{NewOrder, Order, STATUS_PENDING};

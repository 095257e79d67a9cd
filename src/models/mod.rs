//! Domain models for order-service.

mod customer;
mod order;
mod product;

pub use customer::Customer;
pub use order::{DraftStatus, OrderLine, OrderTotals, SubmissionPayload};
pub use product::Product;

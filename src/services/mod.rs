//! Service-layer components: the order engine, upstream HTTP clients, and
//! the Prometheus registry.

pub mod catalog_client;
pub mod metrics;
pub mod order_builder;
pub mod order_client;

pub use catalog_client::CatalogClient;
pub use order_builder::{OrderBuilder, OrderDraft, OrderError};
pub use order_client::OrderClient;

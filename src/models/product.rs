//! Product catalog model for order-service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Product record from the external catalog. Read-only to this service;
/// the order engine only ever snapshots fields from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub product_id: Uuid,
    pub name: String,
    pub unit_price: Decimal,
    pub unit_label: String,
    pub stock_count: i32,
    pub category: String,
    pub image_url: Option<String>,
}

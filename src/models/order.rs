//! Order line and derived order types for order-service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row in a working order, keyed by product id.
///
/// `original_price` is snapshotted at first addition and never rewritten;
/// `discounted_price` is derived from it whenever a discount is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: Uuid,
    pub name: String,
    pub unit_price: Decimal,
    pub original_price: Decimal,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<Decimal>,
}

impl OrderLine {
    /// Price the line currently sells at: discounted when a discount has
    /// been applied, otherwise the price captured at add time.
    pub fn effective_price(&self) -> Decimal {
        self.discounted_price.unwrap_or(self.original_price)
    }
}

/// Draft lifecycle state. A draft accepts mutations only while composing;
/// a second submission is refused while one is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftStatus {
    Composing,
    Submitting,
}

/// Aggregates derived from the current line state. Recomputed from scratch
/// on every read; never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub total_quantity: u32,
    pub total_amount: Decimal,
    pub total_discount_amount: Decimal,
    pub discount_rate: u32,
}

/// Immutable snapshot handed to the submission collaborator. Field names
/// are the upstream orders API wire contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub customer: Uuid,
    pub products: Vec<OrderLine>,
    pub discount: u32,
}

//! Customer catalog model for order-service.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Customer record from the external catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: Uuid,
    pub name: String,
    pub account_code: String,
    pub customer_type: String,
}

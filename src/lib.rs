pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod services;
pub mod startup;

use services::{CatalogClient, OrderClient, OrderDraft};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory store of working order drafts, keyed by draft id.
pub type DraftStore = Arc<RwLock<HashMap<Uuid, OrderDraft>>>;

/// Shared application state containing the draft store and service clients
#[derive(Clone)]
pub struct AppState {
    pub drafts: DraftStore,
    pub catalog_client: Arc<CatalogClient>,
    pub order_client: Arc<OrderClient>,
}

impl AppState {
    pub fn new(catalog_client: Arc<CatalogClient>, order_client: Arc<OrderClient>) -> Self {
        Self {
            drafts: Arc::new(RwLock::new(HashMap::new())),
            catalog_client,
            order_client,
        }
    }
}

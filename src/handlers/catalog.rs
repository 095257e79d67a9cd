//! Catalog proxy handlers.
//!
//! A catalog fetch failure is recovered by returning an empty list and
//! logging; the order engine is unaffected since it never fetches.

use crate::models::{Customer, Product};
use crate::AppState;
use axum::{extract::State, Json};

/// GET /api/products
pub async fn list_products(State(state): State<AppState>) -> Json<Vec<Product>> {
    match state.catalog_client.get_products().await {
        Ok(products) => Json(products),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch products from catalog");
            Json(Vec::new())
        }
    }
}

/// GET /api/customers
pub async fn list_customers(State(state): State<AppState>) -> Json<Vec<Customer>> {
    match state.catalog_client.get_customers().await {
        Ok(customers) => Json(customers),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch customers from catalog");
            Json(Vec::new())
        }
    }
}

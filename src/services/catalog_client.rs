use crate::config::CatalogServiceSettings;
use crate::error::AppError;
use crate::models::{Customer, Product};
use reqwest::Client;
use std::time::Duration;

/// Read-only client for the external catalog API.
pub struct CatalogClient {
    client: Client,
    settings: CatalogServiceSettings,
}

impl CatalogClient {
    pub fn new(settings: CatalogServiceSettings) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client, settings })
    }

    /// Fetch the product catalog.
    pub async fn get_products(&self) -> Result<Vec<Product>, AppError> {
        self.get_list("/api/products").await
    }

    /// Fetch the customer catalog.
    pub async fn get_customers(&self) -> Result<Vec<Customer>, AppError> {
        self.get_list("/api/customers").await
    }

    async fn get_list<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Vec<T>, AppError> {
        let url = format!("{}{}", self.settings.url, path);

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::error!("Failed to send GET request to {}: {}", url, e);
            AppError::BadGateway(format!("catalog request failed: {}", e))
        })?;

        if !response.status().is_success() {
            return Err(AppError::BadGateway(format!(
                "catalog returned status {}",
                response.status()
            )));
        }

        response.json::<Vec<T>>().await.map_err(|e| {
            tracing::error!("Failed to parse catalog response from {}: {}", url, e);
            AppError::BadGateway(format!("catalog response malformed: {}", e))
        })
    }
}

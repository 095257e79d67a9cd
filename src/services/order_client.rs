use crate::config::OrderServiceSettings;
use crate::error::AppError;
use crate::models::SubmissionPayload;
use reqwest::Client;
use std::time::Duration;

/// Client for the upstream orders API that persists submitted orders.
pub struct OrderClient {
    client: Client,
    settings: OrderServiceSettings,
}

impl OrderClient {
    pub fn new(settings: OrderServiceSettings) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client, settings })
    }

    /// Submit an order payload. A transport failure or non-success status
    /// is reported as a gateway error; the caller decides what happens to
    /// the draft.
    pub async fn submit(&self, payload: &SubmissionPayload) -> Result<(), AppError> {
        let url = format!("{}/api/orders", self.settings.url);

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send POST request to {}: {}", url, e);
                AppError::BadGateway(format!("order submission failed: {}", e))
            })?;

        if !response.status().is_success() {
            tracing::error!(
                status = %response.status(),
                customer = %payload.customer,
                "Order submission rejected by upstream"
            );
            return Err(AppError::BadGateway(format!(
                "order submission returned status {}",
                response.status()
            )));
        }

        Ok(())
    }
}

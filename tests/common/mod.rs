use order_service::config::Settings;
use order_service::startup::Application;

pub struct TestApp {
    pub address: String,
    pub port: u16,
}

impl TestApp {
    /// Spawn the service with unreachable upstreams. Tests that only
    /// exercise the service's own state never touch them; tests that do
    /// reach out get the degraded behavior on purpose.
    pub async fn spawn() -> Self {
        Self::spawn_with_orders_url("http://127.0.0.1:1").await
    }

    /// Spawn the service with the orders upstream pointed at `orders_url`.
    pub async fn spawn_with_orders_url(orders_url: &str) -> Self {
        let mut settings = Settings::default();
        settings.server.host = "127.0.0.1".to_string();
        settings.server.port = 0;
        settings.catalog_service.url = "http://127.0.0.1:1".to_string();
        settings.catalog_service.timeout_seconds = 2;
        settings.order_service.url = orders_url.to_string();
        settings.order_service.timeout_seconds = 2;

        let app = Application::build(settings)
            .await
            .expect("Failed to build test application");
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }

        TestApp { address, port }
    }

    pub fn client(&self) -> reqwest::Client {
        reqwest::Client::new()
    }

    /// Create an empty draft and return its id.
    pub async fn create_draft(&self) -> String {
        let response = self
            .client()
            .post(format!("{}/api/drafts", self.address))
            .send()
            .await
            .expect("Failed to create draft");
        assert_eq!(response.status(), 201);

        let body: serde_json::Value = response.json().await.expect("Invalid draft response");
        body["draft_id"].as_str().expect("Missing draft_id").to_string()
    }
}

/// Request body for adding a product line, in the catalog record shape.
pub fn product_body(product_id: &str, name: &str, unit_price: u32) -> serde_json::Value {
    serde_json::json!({
        "product_id": product_id,
        "name": name,
        "unit_price": unit_price,
        "unit_label": "each",
        "stock_count": 100,
        "category": "test",
    })
}

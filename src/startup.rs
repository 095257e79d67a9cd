//! Application startup and lifecycle management.

use axum::{
    middleware::from_fn,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::Settings;
use crate::error::AppError;
use crate::handlers::{
    app::health_check,
    catalog::{list_customers, list_products},
    drafts::{
        add_line, apply_discount, create_draft, delete_draft, get_draft, remove_line,
        set_line_quantity, submit_draft,
    },
    metrics::metrics,
};
use crate::middleware::metrics::metrics_middleware;
use crate::middleware::tracing::{request_id_middleware, RequestId};
use crate::services::metrics::init_metrics;
use crate::services::{CatalogClient, OrderClient};
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/api/products", get(list_products))
        .route("/api/customers", get(list_customers))
        .route("/api/drafts", post(create_draft))
        .route("/api/drafts/:draft_id", get(get_draft).delete(delete_draft))
        .route("/api/drafts/:draft_id/lines", post(add_line))
        .route(
            "/api/drafts/:draft_id/lines/:product_id",
            put(set_line_quantity).delete(remove_line),
        )
        .route("/api/drafts/:draft_id/discount", post(apply_discount))
        .route("/api/drafts/:draft_id/submit", post(submit_draft))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .extensions()
                    .get::<RequestId>()
                    .map(RequestId::as_str)
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(settings: Settings) -> Result<Self, AppError> {
        init_metrics();

        let catalog_client = Arc::new(CatalogClient::new(settings.catalog_service.clone())?);
        let order_client = Arc::new(OrderClient::new(settings.order_service.clone())?);
        let state = AppState::new(catalog_client, order_client);

        let address = format!("{}:{}", settings.server.host, settings.server.port);
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind HTTP listener");
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(port = port, "Order service listener bound");

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        tracing::info!(
            service = "order-service",
            version = env!("CARGO_PKG_VERSION"),
            port = self.port,
            "Service ready to accept connections"
        );

        axum::serve(self.listener, router).await
    }
}

//! REST API implementation
//!
//! This module provides the HTTP API for SpanExplore: decoding, encoding and
//! updating explore view query params.

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::Result;
use crate::query::OrganizationFeatures;

/// HTTP API server
pub struct HttpServer {
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(features: OrganizationFeatures) -> Self {
        Self {
            state: AppState::new(features),
        }
    }

    /// Router with CORS and request tracing applied
    pub fn app(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        create_router(self.state.clone())
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Start the HTTP server, stopping on Ctrl+C
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.app();

        let listener = TcpListener::bind(addr).await?;

        info!("HTTP server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                info!("Ctrl+C received, shutting down...");
            })
            .await?;

        Ok(())
    }
}

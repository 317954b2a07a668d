//! HTTP invocation surface
//!
//! Lets a webhook relay or an EventBridge API destination deliver events
//! to the handler over HTTP.

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;

use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::alerting::EventHandler;
use crate::error::Result;

/// HTTP API server
pub struct HttpServer {
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(handler: Arc<EventHandler>) -> Self {
        Self {
            state: AppState { handler },
        }
    }

    /// Start the HTTP server and run until the process is interrupted
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = create_router(self.state).layer(TraceLayer::new_for_http());

        let listener = TcpListener::bind(addr).await?;

        info!("HTTP server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("HTTP server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Ctrl+C received, shutting down...");
    }
}

//! HTTP lookup server for mention names.
//!
//! Serves `GET /mentions?q=` and `GET /health` over the shared [`NameIndex`].

mod routes;

pub use routes::{HealthResponse, MentionParams};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};

use crate::names::NameIndex;

/// Shared state for the route handlers.
#[derive(Debug, Clone)]
pub struct MentionServerState {
    pub names: Arc<NameIndex>,
}

/// Build the router. Exposed separately so it can be mounted elsewhere.
pub fn router(names: Arc<NameIndex>) -> Router {
    // Any origin may query; the browser UI is served from a different port
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/mentions", get(routes::mentions_handler))
        .route("/health", get(routes::health_handler))
        .layer(cors)
        .with_state(MentionServerState { names })
}

/// Start the mention server on a specific address.
///
/// Bind to port 0 to get a random port; the bound address is returned.
pub async fn start_mention_server_on(
    addr: SocketAddr,
    names: Arc<NameIndex>,
) -> color_eyre::Result<(JoinHandle<()>, SocketAddr)> {
    let app = router(names);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    tracing::info!("Mention server listening on http://{}", actual_addr);

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Mention server error: {}", e);
        }
    });

    Ok((handle, actual_addr))
}

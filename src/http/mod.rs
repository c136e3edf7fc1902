pub mod error;
pub mod handlers;

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::infrastructure::shutdown::ShutdownListener;

pub use handlers::SharedService;

pub fn router(service: SharedService) -> Router {
    Router::new()
        .route("/predict", post(handlers::predict))
        .route("/suggest_reply", post(handlers::suggest_reply))
        .route("/health", get(handlers::health))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Any origin, method and header, with credentials. A literal `*` cannot be
/// combined with credentials, so the request's own values are echoed back.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub async fn serve(
    service: SharedService,
    addr: SocketAddr,
    mut shutdown: ShutdownListener,
) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(target: "http", addr = %listener.local_addr()?, "listening");

    axum::serve(listener, router(service))
        .with_graceful_shutdown(async move { shutdown.notified().await })
        .await
        .context("http server terminated with an error")?;

    tracing::info!(target: "http", "server stopped");
    Ok(())
}

//! HTTP surface for the catalog service.
//!
//! JSON in, JSON out; rendering is left to whatever client sits in front.

#[cfg(feature = "http-server")]
pub mod handlers;

#[cfg(feature = "http-server")]
pub use handlers::{AppState, PurchaseResponse};

/// Build the application router over a shared [`CatalogApp`](crate::app::CatalogApp).
#[cfg(feature = "http-server")]
pub fn router(app: std::sync::Arc<crate::app::CatalogApp>) -> axum::Router {
    use axum::routing::{get, post};

    axum::Router::new()
        .route("/health", get(handlers::health))
        .route("/status", get(handlers::status))
        .route(
            "/vehicles",
            get(handlers::list_vehicles).post(handlers::add_vehicle),
        )
        .route("/predict", post(handlers::predict))
        .route("/orders", post(handlers::submit_order))
        .route("/sales", get(handlers::list_sales))
        .with_state(app)
}

#[cfg(feature = "http-server")]
pub async fn serve_http(config: crate::Settings, bind: String) -> anyhow::Result<()> {
    use crate::app::CatalogApp;
    use std::sync::Arc;
    use tower_http::trace::TraceLayer;

    crate::log_event!("http", "starting", "catalog server on {bind}");

    // Asset loading touches the filesystem; keep it off the async workers
    let app = tokio::task::spawn_blocking(move || CatalogApp::from_settings(&config)).await?;
    let status = app.status();
    crate::log_event!(
        "http",
        "assets",
        "model: {}, labels: {}, dataset: {}",
        if status.model_loaded { "loaded" } else { "unavailable" },
        status.labels,
        if status.dataset_present { "present" } else { "missing" }
    );

    let router = router(Arc::new(app)).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    crate::log_event!("http", "listening", "http://{bind}");
    eprintln!("Catalog server listening on http://{bind}");
    eprintln!("Health check: http://{bind}/health");
    eprintln!("Press Ctrl+C to stop the server");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    crate::log_event!("http", "stopped");
    eprintln!("HTTP server shut down gracefully");
    Ok(())
}

#[cfg(feature = "http-server")]
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("[http] failed to listen for ctrl+c: {e}");
        std::future::pending::<()>().await;
    }
    eprintln!("Received shutdown signal");
}

#[cfg(not(feature = "http-server"))]
pub async fn serve_http(_config: crate::Settings, _bind: String) -> anyhow::Result<()> {
    eprintln!("HTTP server support is not compiled in.");
    eprintln!("Please rebuild with: cargo build --features http-server");
    std::process::exit(1);
}

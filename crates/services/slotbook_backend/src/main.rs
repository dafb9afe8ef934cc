// File: services/slotbook_backend/src/main.rs
use axum::{routing::get, Router};
use slotbook_booking::routes as booking_routes;
use slotbook_common::logging;
use slotbook_config::load_config;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::info;

mod service_factory;
use service_factory::SlotbookServiceFactory;

#[tokio::main]
async fn main() {
    logging::init();

    let config = Arc::new(load_config().expect("Failed to load config"));
    let factory = Arc::new(SlotbookServiceFactory::new(config.clone()).await);

    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to Slotbook API!" }))
        .merge(booking_routes::routes(config.clone(), factory));

    let mut app = Router::new().nest("/api", api_router);

    // Serve the static frontend build in dev mode
    if cfg!(debug_assertions) {
        info!("Running in development mode, serving static files from ./dist");
        app = app.fallback_service(ServeDir::new("dist"));
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Failed to bind server address");
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("Server error");
}

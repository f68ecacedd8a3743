//! Coin Catalog API Server
//!
//! Provides REST endpoints for:
//! - Photo intake (downscaling to fit the document size ceiling)
//! - Coin number duplicate checks
//! - Record submission
//! - Listing with search, ordering and paging
//! - PDF report export

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

mod config;
mod error;
mod handlers;
mod models;
mod state;
mod store;
#[cfg(test)]
mod tests;

use config::Args;
use state::AppState;

/// Build the router with all endpoints
pub fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    // CORS configuration for web clients
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Photo intake
        .route("/api/images/intake", post(handlers::intake_image))
        // Coin records
        .route(
            "/api/coins",
            get(handlers::list_coins).post(handlers::create_coin),
        )
        .route("/api/coins/exists", get(handlers::check_coin_no))
        .route("/api/coins/report", get(handlers::export_report))
        // Add middleware
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let default_level = if args.verbose { "coin_api=debug" } else { "coin_api=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_level.parse()?)
                .add_directive("coin_intake=info".parse()?)
                .add_directive("coin_report=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    // Initialize application state
    info!("Initializing coin catalog API...");
    let state = Arc::new(AppState::new(&args.database_url()).await?);

    let app = build_router(state, args.max_body_bytes);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    info!("Starting coin catalog API on http://{}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

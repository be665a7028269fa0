use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod forecast;
pub mod handlers;
pub mod models;
pub mod seed;

use crate::catalog::Catalog;
use crate::forecast::{Clock, Forecaster};

pub const API_SERVICE: &str = "pharma-api";
pub const SIMULATED_SERVICE: &str = "pharma-mock";

/// State of the store-backed service. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::SqlitePool,
    pub forecaster: Arc<dyn Forecaster>,
}

/// State of the in-memory service.
#[derive(Clone)]
pub struct SimulatedState {
    pub catalog: Arc<Catalog>,
    pub forecaster: Arc<dyn Forecaster>,
    pub clock: Arc<dyn Clock>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // ── Liveness ────────────────────────────────────────────────────────
        .route("/", get(handlers::index))
        .route("/health", get(|| handlers::health(API_SERVICE)))

        // ── Inventory ───────────────────────────────────────────────────────
        .route("/api/inventory", get(handlers::inventory::list_inventory))
        .route(
            "/api/inventory/summary",
            get(handlers::inventory::inventory_summary),
        )

        // ── Forecast ────────────────────────────────────────────────────────
        .route("/api/forecast/:id", get(handlers::forecast::forecast))

        // ── Middleware ──────────────────────────────────────────────────────
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn build_simulated_router(state: SimulatedState) -> Router {
    Router::new()
        .route("/health", get(|| handlers::health(SIMULATED_SERVICE)))
        .route("/api/inventory", get(handlers::simulated::list_inventory))
        .route(
            "/api/inventory/summary",
            get(handlers::simulated::inventory_summary),
        )
        .route("/api/forecast/:id", get(handlers::simulated::forecast))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Structured logging for both binaries; `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,pharma_forecast=debug")),
        )
        .with_target(false)
        .compact()
        .init();
}

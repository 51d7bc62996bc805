//! # pricing-server
//!
//! REST API over the linear resale price models. Every handler evaluates
//! with the same `pricing-core` evaluator that clients embed.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use pricing_api::PricePredictor;

pub mod config;
pub mod error;
pub mod routes;

pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ErrorResponse};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<PricePredictor>,
    /// Where the tables came from, reported by readiness
    pub source: Arc<str>,
}

impl AppState {
    pub fn new(predictor: PricePredictor, source: &str) -> Self {
        Self {
            predictor: Arc::new(predictor),
            source: Arc::from(source),
        }
    }
}

/// Liveness probe - is the server running?
async fn liveness() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe - are tables loaded?
async fn readiness(State(state): State<AppState>) -> Json<serde_json::Value> {
    let tables = state.predictor.tables();
    let config = state.predictor.config();
    Json(serde_json::json!({
        "status": "ready",
        "version": env!("CARGO_PKG_VERSION"),
        "source": &*state.source,
        "models": tables.model_ids().count(),
        "months": tables.months().len(),
        "first_month": tables.months().first().map(|m| m.to_string()),
        "last_month": tables.months().last().map(|m| m.to_string()),
        "reference_month": config.reference_month.to_string(),
        "window_size": config.window_size,
    }))
}

/// Router with every route; middleware is added by the binary
pub fn app(state: AppState) -> Router {
    Router::new()
        // Health endpoints (Kubernetes-compatible)
        .route("/health/live", get(liveness))
        .route("/health/ready", get(readiness))
        .route("/health", get(liveness))
        // API endpoints
        .route("/api/v1/options", get(routes::options))
        .route("/api/v1/predict", get(routes::predict_query).post(routes::predict_json))
        .route("/api/v1/predict/form", post(routes::predict_form))
        .route("/api/v1/models/:model_id/score", post(routes::score_rows))
        // Published tables
        .route("/tables/:file", get(routes::table_document))
        .with_state(state)
}

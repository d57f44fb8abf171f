// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// Read-only views of the latest scan snapshot. `/` and `/results` are the
// dashboard's contract; everything else lives under `/api/v1/`.
//
// CORS is fully permissive: the page may be served from anywhere.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use crate::app_state::AppState;
use crate::engine::TradeSetup;
use crate::scanner::ScanSnapshot;

const INDEX_HTML: &str = include_str!("../../static/index.html");

// =============================================================================
// Router construction
// =============================================================================

/// Build the REST router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // ── Dashboard ───────────────────────────────────────────────
        .route("/", get(index))
        .route("/results", get(results))
        // ── API ─────────────────────────────────────────────────────
        .route("/api/v1/health", get(health))
        .route("/api/v1/scan", get(scan))
        .route("/api/v1/results/:symbol", get(result_for_symbol))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Dashboard
// =============================================================================

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

#[derive(Serialize)]
struct ResultsResponse {
    data: Vec<TradeSetup>,
}

async fn results(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ResultsResponse {
        data: state.latest().results.clone(),
    })
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    scan_version: u64,
    uptime_secs: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        scan_version: state.current_scan_version(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Full snapshot
// =============================================================================

#[derive(Serialize)]
struct ScanResponse {
    scan_version: u64,
    age_secs: Option<i64>,
    #[serde(flatten)]
    snapshot: ScanSnapshot,
}

async fn scan(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ScanResponse {
        scan_version: state.current_scan_version(),
        age_secs: state.snapshot_age_secs(),
        snapshot: state.latest().as_ref().clone(),
    })
}

// =============================================================================
// Single ticker
// =============================================================================

async fn result_for_symbol(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<Json<TradeSetup>, (StatusCode, Json<serde_json::Value>)> {
    state.find_result(&symbol).map(Json).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "error": format!("no result for '{}' in the latest scan", symbol.to_uppercase()),
            })),
        )
    })
}

//! Frame Solver HTTP Server

use axum::{
    extract::Json,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use log::info;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};

use frame_solver::io::{FrameDocument, FrameReport};
use frame_solver::prelude::*;

const DEFAULT_PORT: u16 = 8086;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Either a bare model document or one wrapped together with options
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AnalysisRequest {
    Wrapped(WrappedRequest),
    Bare(FrameDocument),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WrappedRequest {
    model: FrameDocument,
    #[serde(default)]
    options: Option<AnalysisOptions>,
}

#[derive(Debug, Serialize)]
struct AnalysisResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    results: Option<FrameReport>,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn analyze(Json(request): Json<AnalysisRequest>) -> impl IntoResponse {
    let result = tokio::task::spawn_blocking(move || run_analysis(request)).await;
    match result {
        Ok(Ok(results)) => (
            StatusCode::OK,
            Json(AnalysisResponse {
                success: true,
                error: None,
                results: Some(results),
            }),
        ),
        Ok(Err(e)) => (
            StatusCode::BAD_REQUEST,
            Json(AnalysisResponse {
                success: false,
                error: Some(e.to_string()),
                results: None,
            }),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(AnalysisResponse {
                success: false,
                error: Some(e.to_string()),
                results: None,
            }),
        ),
    }
}

fn run_analysis(request: AnalysisRequest) -> FrameResult<FrameReport> {
    let (document, options) = match request {
        AnalysisRequest::Wrapped(wrapped) => (wrapped.model, wrapped.options.unwrap_or_default()),
        AnalysisRequest::Bare(document) => (document, AnalysisOptions::default()),
    };

    let mut system = document.into_system()?.with_options(options);
    system.solve()?;
    Ok(FrameReport::from_system(&system))
}

fn port() -> u16 {
    std::env::var("FRAME_SOLVER_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/v1/analyze", post(analyze))
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], port()));
    info!("Frame Solver Server listening on http://{}", addr);
    println!("Frame Solver Server listening on http://{}", addr);
    println!("  Health check: GET  /health");
    println!("  Analysis:     POST /api/v1/analyze");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

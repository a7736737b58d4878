// topmatchnba - Web Server
// Read-only REST API over the daily reports, plus the ranking page

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use topmatchnba::{parse_report_date, read_report, report_path, RankedGame};

const DEFAULT_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_DATA_DIR: &str = "data";

/// Shared application state
#[derive(Clone)]
struct AppState {
    data_dir: Arc<PathBuf>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    fn err(data: T, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data,
            error: Some(message.into()),
        }
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/games/:date - Ranked games for a DD-MM-YYYY date
async fn get_games(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> impl IntoResponse {
    let Some(day) = parse_report_date(&date) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::err(
                Vec::<RankedGame>::new(),
                format!("invalid date '{}', expected DD-MM-YYYY", date),
            )),
        )
            .into_response();
    };

    let path = report_path(&state.data_dir, day);
    if !path.exists() {
        warn!(path = %path.display(), "report not found");
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::err(
                Vec::<RankedGame>::new(),
                format!("no report for {}", date),
            )),
        )
            .into_response();
    }

    match read_report(&path) {
        Ok(games) => (StatusCode::OK, Json(ApiResponse::ok(games))).into_response(),
        Err(e) => {
            error!("Error reading report {}: {:#}", path.display(), e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::err(Vec::<RankedGame>::new(), "failed to read report")),
            )
                .into_response()
        }
    }
}

/// GET / - Serve index.html
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("🌐 topmatchnba {} - Web Server", topmatchnba::VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let addr = std::env::var("TOPMATCHNBA_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let data_dir = PathBuf::from(
        std::env::var("TOPMATCHNBA_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string()),
    );

    if !data_dir.exists() {
        warn!(dir = %data_dir.display(), "data directory does not exist yet");
    }

    let state = AppState {
        data_dir: Arc::new(data_dir.clone()),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/games/:date", get(get_games))
        .with_state(state);

    // Build main router
    let app = Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .nest_service("/data", ServeDir::new(data_dir))
        .nest_service("/static", ServeDir::new("web"))
        .layer(CorsLayer::permissive());

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!(%addr, "server running");
    println!("\n🚀 Server running on http://{}", addr);
    println!("   API: http://{}/api/games/DD-MM-YYYY", addr);
    println!("\n   Press Ctrl+C to stop\n");

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

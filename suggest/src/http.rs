//! HTTP endpoint.
//!
//! # Endpoints
//!
//! - `GET /search?prefix=<p>` - words starting with `p`
//! - `GET /health` - liveness and dictionary size
//! - `POST /reload` - rebuild the dictionary from the configured corpus

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::error::{Result, SuggestError};
use crate::{Config, Suggester};

/// Application state shared across handlers.
pub struct AppState {
    /// Dictionary being served.
    pub suggester: Suggester,
    /// Corpus re-read on `POST /reload`.
    pub corpus_path: PathBuf,
}

#[derive(Debug, Serialize)]
struct SearchResponse {
    words: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    words: usize,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct ReloadResponse {
    words: usize,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Builds the router over `state`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/search", get(handle_search))
        .route("/health", get(handle_health))
        .route("/reload", post(handle_reload))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `config.listen` and serves `suggester` until Ctrl-C.
pub async fn serve(config: &Config, suggester: Suggester) -> Result<()> {
    let state = Arc::new(AppState {
        suggester,
        corpus_path: config.corpus_path.clone(),
    });
    let app = router(state);

    let listener = TcpListener::bind(config.listen)
        .await
        .map_err(|source| SuggestError::Bind {
            addr: config.listen,
            source,
        })?;

    info!(address = %config.listen, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(SuggestError::Serve)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

/// Handle GET /search
///
/// Query pairs are taken as a list so a repeated `prefix` resolves to its
/// first value instead of failing deserialization.
async fn handle_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let prefix = params
        .into_iter()
        .find_map(|(name, value)| (name == "prefix").then_some(value));
    let prefix = match prefix {
        Some(prefix) if !prefix.is_empty() => prefix,
        _ => return error_response(StatusCode::BAD_REQUEST, "Prefix parameter is required"),
    };

    // Short prefixes visit most of the tree.
    let result = tokio::task::spawn_blocking(move || state.suggester.suggest(&prefix)).await;

    match result {
        Ok(words) => (StatusCode::OK, Json(SearchResponse { words })).into_response(),
        Err(e) => {
            error!(error = %e, "search task failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// Handle GET /health
async fn handle_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        words: state.suggester.len(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Handle POST /reload
async fn handle_reload(State(state): State<Arc<AppState>>) -> Response {
    let task_state = Arc::clone(&state);
    let result = tokio::task::spawn_blocking(move || {
        task_state
            .suggester
            .reload_corpus(&task_state.corpus_path)
    })
    .await
    .map_err(SuggestError::from)
    .and_then(|inner| inner);

    match result {
        Ok(words) => (StatusCode::OK, Json(ReloadResponse { words })).into_response(),
        Err(e) => {
            error!(error = %e, path = %state.corpus_path.display(), "reload failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

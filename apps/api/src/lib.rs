//! # ledger-api: HTTP/JSON Surface of ProjectLedger
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  request                                                                │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  NormalizePath (trailing slash)  ──►  CORS  ──►  Trace                  │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  routes::{health, clients, courses, lessons, types}                     │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  AppState.db (ledger-db repositories)  ──►  ledger-core pricing/reports │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  Json<T>  or  ApiError { code, message }                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod routes;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::Router;
use ledger_db::Database;
use tower::Layer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;

use crate::config::ConfigError;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db }
    }
}

/// All routes with tracing, bound to `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::clients::router())
        .merge(routes::courses::router())
        .merge(routes::lessons::router())
        .merge(routes::types::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy for the configured frontend origins.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, ConfigError> {
    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| ConfigError::InvalidValue("LEDGER_CORS_ORIGINS".to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE]))
}

/// The complete application: `/clients/` and `/clients` hit the same handler.
///
/// Path normalization has to run before routing, so it wraps the router
/// instead of being one of its layers.
pub fn app(state: AppState, cors: CorsLayer) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state).layer(cors))
}

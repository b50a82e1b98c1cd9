use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::routes::MessageResponse;
use crate::AppState;

/// Health check response payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Crate version from Cargo.toml.
    pub version: String,
    pub database: DatabaseHealth,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseHealth {
    pub healthy: bool,
    pub migrations_applied: usize,
    pub migrations_total: usize,
}

/// GET / -- welcome message.
async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new("ProjectLedger API"))
}

/// GET /health -- returns service and database health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let healthy = state.db.health_check().await;

    let (migrations_total, migrations_applied, migrated) = match state.db.migration_status().await {
        Ok((total, applied)) => (total, applied, applied == total),
        Err(e) => {
            tracing::warn!(error = %e, "Could not read migration status");
            (0, 0, false)
        }
    };

    let status = if healthy && migrated {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: DatabaseHealth {
            healthy,
            migrations_applied,
            migrations_total,
        },
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
}

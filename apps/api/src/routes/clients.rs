//! Client endpoints, including per-client pricing and reports.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use ledger_core::validation::parse_price;
use ledger_core::{CatalogEntry, Client, ClientCourseSummary, ClientReport, NewClient};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::routes::MessageResponse;
use crate::AppState;

/// Response of the override upsert.
#[derive(Debug, Serialize, Deserialize)]
pub struct PriceSaved {
    pub message: String,
    pub value: Decimal,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/clients", get(list_clients).post(create_client))
        .route("/clients/report/all", get(all_clients_report))
        .route(
            "/clients/{id}",
            get(get_client).put(rename_client).delete(delete_client),
        )
        .route("/clients/{id}/types", get(client_types))
        .route(
            "/clients/{id}/types/{type_id}",
            put(set_client_type_price).delete(clear_client_type_price),
        )
        .route("/clients/{id}/report", get(client_report))
        .route("/clients/{id}/courses", get(client_courses))
}

async fn list_clients(State(state): State<AppState>) -> ApiResult<Json<Vec<Client>>> {
    Ok(Json(state.db.clients().list().await?))
}

async fn create_client(
    State(state): State<AppState>,
    payload: Result<Json<NewClient>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Client>)> {
    let Json(input) = payload?;
    let client = state.db.clients().create(&input).await?;
    tracing::info!(id = %client.id, name = %client.name, "Client created");
    Ok((StatusCode::CREATED, Json(client)))
}

async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Client>> {
    let client = state
        .db
        .clients()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Client", &id))?;
    Ok(Json(client))
}

async fn rename_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<NewClient>, JsonRejection>,
) -> ApiResult<Json<Client>> {
    let Json(input) = payload?;
    Ok(Json(state.db.clients().rename(&id, &input).await?))
}

async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.db.clients().delete(&id).await?;
    tracing::info!(id = %id, "Client deleted");
    Ok(Json(MessageResponse::new("Client deleted")))
}

/// Every lesson type with the client's override merged in.
async fn client_types(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<CatalogEntry>>> {
    Ok(Json(state.db.ledger().merged_catalog(&id).await?))
}

/// Body is untyped on purpose: `{"value": 40}` and `{"value": "40"}` are both
/// accepted, anything non-numeric is a 400 before the store is touched.
async fn set_client_type_price(
    State(state): State<AppState>,
    Path((id, type_id)): Path<(String, String)>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<PriceSaved>> {
    let Json(body) = payload?;
    let raw = body.get("value").unwrap_or(&Value::Null);
    let value = parse_price("value", raw)?;

    let stored = state
        .db
        .client_prices()
        .set_client_price(&id, &type_id, value)
        .await?;

    Ok(Json(PriceSaved {
        message: "Client type price saved".to_string(),
        value: stored.value,
    }))
}

async fn clear_client_type_price(
    State(state): State<AppState>,
    Path((id, type_id)): Path<(String, String)>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .db
        .client_prices()
        .clear_client_price(&id, &type_id)
        .await?;
    Ok(Json(MessageResponse::new("Client type price cleared")))
}

async fn client_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ClientReport>> {
    Ok(Json(state.db.ledger().client_report(&id).await?))
}

async fn all_clients_report(State(state): State<AppState>) -> ApiResult<Json<Vec<ClientReport>>> {
    Ok(Json(state.db.ledger().all_client_reports().await?))
}

async fn client_courses(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<ClientCourseSummary>>> {
    Ok(Json(state.db.ledger().client_courses_summary(&id).await?))
}

//! Lesson type (base price list) endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use ledger_core::{LessonType, NewLessonType};

use crate::error::{ApiError, ApiResult};
use crate::routes::MessageResponse;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/types", get(list_types).post(create_type))
        .route(
            "/types/{id}",
            get(get_type).put(update_type).delete(delete_type),
        )
}

async fn list_types(State(state): State<AppState>) -> ApiResult<Json<Vec<LessonType>>> {
    Ok(Json(state.db.lesson_types().list().await?))
}

async fn create_type(
    State(state): State<AppState>,
    payload: Result<Json<NewLessonType>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<LessonType>)> {
    let Json(input) = payload?;
    let lesson_type = state.db.lesson_types().create(&input).await?;
    tracing::info!(id = %lesson_type.id, name = %lesson_type.name, "Lesson type created");
    Ok((StatusCode::CREATED, Json(lesson_type)))
}

async fn get_type(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<LessonType>> {
    let lesson_type = state
        .db
        .lesson_types()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("LessonType", &id))?;
    Ok(Json(lesson_type))
}

async fn update_type(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<NewLessonType>, JsonRejection>,
) -> ApiResult<Json<LessonType>> {
    let Json(input) = payload?;
    Ok(Json(state.db.lesson_types().update(&id, &input).await?))
}

/// Removes the type and its overrides; lessons using it keep existing at zero value.
async fn delete_type(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.db.lesson_types().delete(&id).await?;
    tracing::info!(id = %id, "Lesson type deleted");
    Ok(Json(MessageResponse::new("Lesson type deleted")))
}

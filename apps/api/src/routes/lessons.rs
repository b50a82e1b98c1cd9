//! Lesson endpoints. Every lesson leaves the server with `unit_value` and
//! `total_value` resolved.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use ledger_core::{LessonUpdate, LessonView, NewLesson};

use crate::error::ApiResult;
use crate::routes::MessageResponse;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/lessons", get(list_lessons).post(create_lesson))
        .route(
            "/lessons/{id}",
            get(get_lesson).put(update_lesson).delete(delete_lesson),
        )
}

async fn list_lessons(State(state): State<AppState>) -> ApiResult<Json<Vec<LessonView>>> {
    Ok(Json(state.db.ledger().valued_lessons().await?))
}

async fn create_lesson(
    State(state): State<AppState>,
    payload: Result<Json<NewLesson>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<LessonView>)> {
    let Json(input) = payload?;
    let lesson = state.db.lessons().create(&input).await?;
    tracing::info!(id = %lesson.id, course_id = %lesson.course_id, "Lesson created");

    let view = state.db.ledger().valued_lesson(&lesson.id).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn get_lesson(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<LessonView>> {
    Ok(Json(state.db.ledger().valued_lesson(&id).await?))
}

async fn update_lesson(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<LessonUpdate>, JsonRejection>,
) -> ApiResult<Json<LessonView>> {
    let Json(input) = payload?;
    state.db.lessons().update(&id, &input).await?;
    Ok(Json(state.db.ledger().valued_lesson(&id).await?))
}

async fn delete_lesson(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.db.lessons().delete(&id).await?;
    Ok(Json(MessageResponse::new("Lesson deleted successfully")))
}

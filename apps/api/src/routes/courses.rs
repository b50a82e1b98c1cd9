//! Course endpoints. Course bodies always carry their lessons with values.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use ledger_core::{CourseDetail, CourseReport, LessonView, NewCourse, Rename};

use crate::error::ApiResult;
use crate::routes::MessageResponse;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/courses", get(list_courses).post(create_course))
        .route("/courses/report/all", get(all_courses_report))
        .route(
            "/courses/{id}",
            get(get_course).put(rename_course).delete(delete_course),
        )
        .route("/courses/{id}/lessons", get(course_lessons))
        .route("/courses/{id}/report", get(course_report))
}

async fn list_courses(State(state): State<AppState>) -> ApiResult<Json<Vec<CourseDetail>>> {
    Ok(Json(state.db.ledger().course_details().await?))
}

async fn create_course(
    State(state): State<AppState>,
    payload: Result<Json<NewCourse>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CourseDetail>)> {
    let Json(input) = payload?;
    let course = state.db.courses().create(&input).await?;
    tracing::info!(id = %course.id, client_id = %course.client_id, "Course created");

    Ok((
        StatusCode::CREATED,
        Json(CourseDetail {
            id: course.id,
            name: course.name,
            client_id: course.client_id,
            lessons: Vec::new(),
        }),
    ))
}

async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<CourseDetail>> {
    Ok(Json(state.db.ledger().course_detail(&id).await?))
}

async fn rename_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Rename>, JsonRejection>,
) -> ApiResult<Json<CourseDetail>> {
    let Json(input) = payload?;
    state.db.courses().rename(&id, &input).await?;
    Ok(Json(state.db.ledger().course_detail(&id).await?))
}

async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.db.courses().delete(&id).await?;
    tracing::info!(id = %id, "Course deleted");
    Ok(Json(MessageResponse::new("Course deleted successfully")))
}

async fn course_lessons(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<LessonView>>> {
    Ok(Json(state.db.ledger().course_lessons(&id).await?))
}

async fn course_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<CourseReport>> {
    Ok(Json(state.db.ledger().course_report(&id).await?))
}

async fn all_courses_report(State(state): State<AppState>) -> ApiResult<Json<Vec<CourseReport>>> {
    Ok(Json(state.db.ledger().all_course_reports().await?))
}

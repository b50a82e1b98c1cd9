//! # Course Repository
//!
//! Database operations for courses. A course belongs to exactly one client and
//! owns its lessons.

use chrono::{DateTime, Utc};
use sqlx::{SqliteExecutor, SqlitePool};
use tracing::debug;

use super::{exists, generate_id};
use crate::error::{DbError, DbResult};
use ledger_core::{Course, NewCourse, Rename};

const COLUMNS: &str = "id, name, client_id, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct CourseRow {
    id: String,
    name: String,
    client_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CourseRow> for Course {
    fn from(row: CourseRow) -> Self {
        Course {
            id: row.id,
            name: row.name,
            client_id: row.client_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub(crate) async fn fetch_all<'e>(executor: impl SqliteExecutor<'e>) -> DbResult<Vec<Course>> {
    let sql = format!("SELECT {COLUMNS} FROM courses ORDER BY rowid");
    let rows = sqlx::query_as::<_, CourseRow>(&sql)
        .fetch_all(executor)
        .await?;

    Ok(rows.into_iter().map(Course::from).collect())
}

pub(crate) async fn fetch_for_client<'e>(
    executor: impl SqliteExecutor<'e>,
    client_id: &str,
) -> DbResult<Vec<Course>> {
    let sql = format!("SELECT {COLUMNS} FROM courses WHERE client_id = ?1 ORDER BY rowid");
    let rows = sqlx::query_as::<_, CourseRow>(&sql)
        .bind(client_id)
        .fetch_all(executor)
        .await?;

    Ok(rows.into_iter().map(Course::from).collect())
}

pub(crate) async fn fetch_one<'e>(
    executor: impl SqliteExecutor<'e>,
    id: &str,
) -> DbResult<Option<Course>> {
    let sql = format!("SELECT {COLUMNS} FROM courses WHERE id = ?1");
    let row = sqlx::query_as::<_, CourseRow>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;

    Ok(row.map(Course::from))
}

/// Repository for course database operations.
#[derive(Debug, Clone)]
pub struct CourseRepository {
    pool: SqlitePool,
}

impl CourseRepository {
    /// Creates a new CourseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CourseRepository { pool }
    }

    /// Lists all courses in insertion order.
    pub async fn list(&self) -> DbResult<Vec<Course>> {
        fetch_all(&self.pool).await
    }

    /// Lists one client's courses. Unknown clients simply have none.
    pub async fn list_for_client(&self, client_id: &str) -> DbResult<Vec<Course>> {
        fetch_for_client(&self.pool, client_id).await
    }

    /// Gets a course by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Course>> {
        fetch_one(&self.pool, id).await
    }

    /// Inserts a new course for an existing client.
    ///
    /// ## Returns
    /// * `Err(DbError::InvalidParent)` - The client doesn't exist
    pub async fn create(&self, input: &NewCourse) -> DbResult<Course> {
        input.validate()?;

        let now = Utc::now();
        let course = Course {
            id: generate_id(),
            name: input.name.trim().to_string(),
            client_id: input.client_id.clone(),
            created_at: now,
            updated_at: now,
        };

        debug!(id = %course.id, client_id = %course.client_id, "Inserting course");

        let mut tx = self.pool.begin().await?;

        if !exists(&mut *tx, "clients", &course.client_id).await? {
            return Err(DbError::invalid_parent("Client", &course.client_id));
        }

        sqlx::query(
            "INSERT INTO courses (id, name, client_id, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&course.id)
        .bind(&course.name)
        .bind(&course.client_id)
        .bind(course.created_at)
        .bind(course.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(course)
    }

    /// Renames a course. The owning client never changes.
    pub async fn rename(&self, id: &str, input: &Rename) -> DbResult<Course> {
        input.validate()?;

        debug!(id = %id, "Renaming course");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE courses SET name = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(input.name.trim())
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Course", id));
        }

        let course = fetch_one(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Course", id))?;

        tx.commit().await?;
        Ok(course)
    }

    /// Deletes a course and its lessons.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting course");

        let result = sqlx::query("DELETE FROM courses WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Course", id));
        }

        Ok(())
    }
}

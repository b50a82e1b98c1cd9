//! # Lesson Repository
//!
//! Database operations for lessons.
//!
//! Lessons store quantity and a lesson type reference only. Prices are never
//! copied onto a lesson: valuation happens at read time through
//! [`LedgerRepository`](super::ledger::LedgerRepository), so a change to a base
//! value or an override shows up in every report immediately.

use chrono::{DateTime, Utc};
use sqlx::{SqliteExecutor, SqlitePool};
use tracing::debug;

use super::{exists, generate_id, parse_decimal};
use crate::error::{DbError, DbResult};
use ledger_core::{Lesson, LessonUpdate, NewLesson};

const COLUMNS: &str = "id, name, quantity, status, course_id, lesson_type_id, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct LessonRow {
    id: String,
    name: String,
    quantity: String,
    status: String,
    course_id: String,
    lesson_type_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<LessonRow> for Lesson {
    type Error = DbError;

    fn try_from(row: LessonRow) -> DbResult<Self> {
        Ok(Lesson {
            quantity: parse_decimal("lessons.quantity", &row.quantity)?,
            id: row.id,
            name: row.name,
            status: row.status,
            course_id: row.course_id,
            lesson_type_id: row.lesson_type_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub(crate) async fn fetch_all<'e>(executor: impl SqliteExecutor<'e>) -> DbResult<Vec<Lesson>> {
    let sql = format!("SELECT {COLUMNS} FROM lessons ORDER BY rowid");
    let rows = sqlx::query_as::<_, LessonRow>(&sql)
        .fetch_all(executor)
        .await?;

    rows.into_iter().map(Lesson::try_from).collect()
}

pub(crate) async fn fetch_for_course<'e>(
    executor: impl SqliteExecutor<'e>,
    course_id: &str,
) -> DbResult<Vec<Lesson>> {
    let sql = format!("SELECT {COLUMNS} FROM lessons WHERE course_id = ?1 ORDER BY rowid");
    let rows = sqlx::query_as::<_, LessonRow>(&sql)
        .bind(course_id)
        .fetch_all(executor)
        .await?;

    rows.into_iter().map(Lesson::try_from).collect()
}

/// Lessons of every course the client owns, in lesson insertion order.
pub(crate) async fn fetch_for_client<'e>(
    executor: impl SqliteExecutor<'e>,
    client_id: &str,
) -> DbResult<Vec<Lesson>> {
    let rows = sqlx::query_as::<_, LessonRow>(
        r#"
        SELECT l.id, l.name, l.quantity, l.status, l.course_id, l.lesson_type_id,
               l.created_at, l.updated_at
        FROM lessons l
        INNER JOIN courses c ON c.id = l.course_id
        WHERE c.client_id = ?1
        ORDER BY l.rowid
        "#,
    )
    .bind(client_id)
    .fetch_all(executor)
    .await?;

    rows.into_iter().map(Lesson::try_from).collect()
}

pub(crate) async fn fetch_one<'e>(
    executor: impl SqliteExecutor<'e>,
    id: &str,
) -> DbResult<Option<Lesson>> {
    let sql = format!("SELECT {COLUMNS} FROM lessons WHERE id = ?1");
    let row = sqlx::query_as::<_, LessonRow>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;

    row.map(Lesson::try_from).transpose()
}

/// Repository for lesson database operations.
#[derive(Debug, Clone)]
pub struct LessonRepository {
    pool: SqlitePool,
}

impl LessonRepository {
    /// Creates a new LessonRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LessonRepository { pool }
    }

    /// Lists all lessons in insertion order.
    pub async fn list(&self) -> DbResult<Vec<Lesson>> {
        fetch_all(&self.pool).await
    }

    /// Lists one course's lessons.
    pub async fn list_for_course(&self, course_id: &str) -> DbResult<Vec<Lesson>> {
        fetch_for_course(&self.pool, course_id).await
    }

    /// Gets a lesson by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Lesson>> {
        fetch_one(&self.pool, id).await
    }

    /// Inserts a new lesson.
    ///
    /// ## Returns
    /// * `Err(DbError::InvalidParent)` - Unknown course or lesson type
    /// * `Err(DbError::BadValue)` - Empty name/status or negative quantity
    pub async fn create(&self, input: &NewLesson) -> DbResult<Lesson> {
        input.validate()?;

        let now = Utc::now();
        let lesson = Lesson {
            id: generate_id(),
            name: input.name.trim().to_string(),
            quantity: input.quantity,
            status: input.status.trim().to_string(),
            course_id: input.course_id.clone(),
            lesson_type_id: Some(input.type_id.clone()),
            created_at: now,
            updated_at: now,
        };

        debug!(
            id = %lesson.id,
            course_id = %lesson.course_id,
            type_id = %input.type_id,
            quantity = %lesson.quantity,
            "Inserting lesson"
        );

        let mut tx = self.pool.begin().await?;

        if !exists(&mut *tx, "courses", &input.course_id).await? {
            return Err(DbError::invalid_parent("Course", &input.course_id));
        }
        if !exists(&mut *tx, "lesson_types", &input.type_id).await? {
            return Err(DbError::invalid_parent("LessonType", &input.type_id));
        }

        sqlx::query(
            r#"
            INSERT INTO lessons (
                id, name, quantity, status, course_id, lesson_type_id, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&lesson.id)
        .bind(&lesson.name)
        .bind(lesson.quantity.to_string())
        .bind(&lesson.status)
        .bind(&lesson.course_id)
        .bind(&lesson.lesson_type_id)
        .bind(lesson.created_at)
        .bind(lesson.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(lesson)
    }

    /// Replaces a lesson's name, quantity, status and lesson type.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Unknown lesson
    /// * `Err(DbError::InvalidParent)` - Unknown lesson type
    pub async fn update(&self, id: &str, input: &LessonUpdate) -> DbResult<Lesson> {
        input.validate()?;

        debug!(id = %id, type_id = %input.type_id, quantity = %input.quantity, "Updating lesson");

        let mut tx = self.pool.begin().await?;

        if !exists(&mut *tx, "lessons", id).await? {
            return Err(DbError::not_found("Lesson", id));
        }
        if !exists(&mut *tx, "lesson_types", &input.type_id).await? {
            return Err(DbError::invalid_parent("LessonType", &input.type_id));
        }

        sqlx::query(
            r#"
            UPDATE lessons SET
                name = ?2,
                quantity = ?3,
                status = ?4,
                lesson_type_id = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(input.name.trim())
        .bind(input.quantity.to_string())
        .bind(input.status.trim())
        .bind(&input.type_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        let lesson = fetch_one(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Lesson", id))?;

        tx.commit().await?;
        Ok(lesson)
    }

    /// Deletes a lesson.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting lesson");

        let result = sqlx::query("DELETE FROM lessons WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Lesson", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use ledger_core::{NewClient, NewCourse, NewLessonType, UnitType, DEFAULT_LESSON_STATUS};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    struct Fixture {
        db: Database,
        course_id: String,
        type_id: String,
    }

    async fn fixture() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let client = db
            .clients()
            .create(&NewClient {
                name: "Acme".to_string(),
            })
            .await
            .unwrap();
        let course = db
            .courses()
            .create(&NewCourse {
                name: "English".to_string(),
                client_id: client.id,
            })
            .await
            .unwrap();
        let lesson_type = db
            .lesson_types()
            .create(&NewLessonType {
                name: "Hour".to_string(),
                unit_type: UnitType::Hour,
                value: dec!(50),
            })
            .await
            .unwrap();

        Fixture {
            db,
            course_id: course.id,
            type_id: lesson_type.id,
        }
    }

    fn new_lesson(f: &Fixture, quantity: Decimal) -> NewLesson {
        NewLesson {
            name: "Intro".to_string(),
            quantity,
            status: DEFAULT_LESSON_STATUS.to_string(),
            course_id: f.course_id.clone(),
            type_id: f.type_id.clone(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let f = fixture().await;
        let repo = f.db.lessons();

        let created = repo.create(&new_lesson(&f, dec!(1.5))).await.unwrap();
        let loaded = repo.get_by_id(&created.id).await.unwrap().unwrap();

        assert_eq!(loaded.quantity, dec!(1.5));
        assert_eq!(loaded.status, "Not started");
        assert_eq!(loaded.lesson_type_id.as_deref(), Some(f.type_id.as_str()));
        assert_eq!(repo.list_for_course(&f.course_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_with_unknown_parents_is_invalid_parent() {
        let f = fixture().await;
        let repo = f.db.lessons();

        let mut input = new_lesson(&f, dec!(1));
        input.course_id = "ghost".to_string();
        let err = repo.create(&input).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidParent { ref entity, .. } if entity == "Course"));

        let mut input = new_lesson(&f, dec!(1));
        input.type_id = "ghost".to_string();
        let err = repo.create(&input).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidParent { ref entity, .. } if entity == "LessonType"));

        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_negative_quantity_is_bad_value() {
        let f = fixture().await;
        let err = f.db.lessons().create(&new_lesson(&f, dec!(-2))).await.unwrap_err();
        assert!(matches!(err, DbError::BadValue(_)));
    }

    #[tokio::test]
    async fn test_update() {
        let f = fixture().await;
        let repo = f.db.lessons();
        let created = repo.create(&new_lesson(&f, dec!(1))).await.unwrap();

        let updated = repo
            .update(
                &created.id,
                &LessonUpdate {
                    name: "Intro (extended)".to_string(),
                    quantity: dec!(2),
                    status: "Done".to_string(),
                    type_id: f.type_id.clone(),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Intro (extended)");
        assert_eq!(updated.quantity, dec!(2));
        assert_eq!(updated.status, "Done");
        assert_eq!(updated.course_id, f.course_id);

        let err = repo
            .update(
                "missing",
                &LessonUpdate {
                    name: "x".to_string(),
                    quantity: dec!(1),
                    status: "Done".to_string(),
                    type_id: f.type_id.clone(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_deleting_lesson_type_detaches_lessons() {
        let f = fixture().await;
        let created = f.db.lessons().create(&new_lesson(&f, dec!(3))).await.unwrap();

        f.db.lesson_types().delete(&f.type_id).await.unwrap();

        let detached = f.db.lessons().get_by_id(&created.id).await.unwrap().unwrap();
        assert!(detached.lesson_type_id.is_none());
    }

    #[tokio::test]
    async fn test_deleting_course_removes_lessons() {
        let f = fixture().await;
        let created = f.db.lessons().create(&new_lesson(&f, dec!(3))).await.unwrap();

        f.db.courses().delete(&f.course_id).await.unwrap();

        assert!(f.db.lessons().get_by_id(&created.id).await.unwrap().is_none());
        assert!(matches!(
            f.db.lessons().delete(&created.id).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }
}

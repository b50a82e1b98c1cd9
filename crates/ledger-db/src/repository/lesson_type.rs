//! # Lesson Type Repository
//!
//! Database operations for lesson types (the base price list).
//!
//! ## Delete Semantics
//! ```text
//! DELETE lesson_types WHERE id = T
//!     │
//!     ├── client_lesson_types (lesson_type_id = T)  → deleted   (CASCADE)
//!     └── lessons (lesson_type_id = T)              → type NULL (SET NULL)
//!                                                     priced at 0 from now on
//! ```

use chrono::{DateTime, Utc};
use sqlx::{SqliteExecutor, SqlitePool};
use tracing::debug;

use super::{generate_id, parse_decimal};
use crate::error::{DbError, DbResult};
use ledger_core::{LessonType, NewLessonType, UnitType};

const COLUMNS: &str = "id, name, unit_type, base_value, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct LessonTypeRow {
    id: String,
    name: String,
    unit_type: UnitType,
    base_value: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<LessonTypeRow> for LessonType {
    type Error = DbError;

    fn try_from(row: LessonTypeRow) -> DbResult<Self> {
        Ok(LessonType {
            base_value: parse_decimal("lesson_types.base_value", &row.base_value)?,
            id: row.id,
            name: row.name,
            unit_type: row.unit_type,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub(crate) async fn fetch_all<'e>(executor: impl SqliteExecutor<'e>) -> DbResult<Vec<LessonType>> {
    let sql = format!("SELECT {COLUMNS} FROM lesson_types ORDER BY rowid");
    let rows = sqlx::query_as::<_, LessonTypeRow>(&sql)
        .fetch_all(executor)
        .await?;

    rows.into_iter().map(LessonType::try_from).collect()
}

pub(crate) async fn fetch_one<'e>(
    executor: impl SqliteExecutor<'e>,
    id: &str,
) -> DbResult<Option<LessonType>> {
    let sql = format!("SELECT {COLUMNS} FROM lesson_types WHERE id = ?1");
    let row = sqlx::query_as::<_, LessonTypeRow>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;

    row.map(LessonType::try_from).transpose()
}

/// Repository for lesson type database operations.
#[derive(Debug, Clone)]
pub struct LessonTypeRepository {
    pool: SqlitePool,
}

impl LessonTypeRepository {
    /// Creates a new LessonTypeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LessonTypeRepository { pool }
    }

    /// Lists all lesson types in insertion order.
    pub async fn list(&self) -> DbResult<Vec<LessonType>> {
        fetch_all(&self.pool).await
    }

    /// Gets a lesson type by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<LessonType>> {
        fetch_one(&self.pool, id).await
    }

    /// Inserts a new lesson type.
    ///
    /// ## Returns
    /// * `Err(DbError::BadValue)` - Empty name or negative value
    /// * `Err(DbError::UniqueViolation)` - Name already taken
    pub async fn create(&self, input: &NewLessonType) -> DbResult<LessonType> {
        input.validate()?;

        let now = Utc::now();
        let lesson_type = LessonType {
            id: generate_id(),
            name: input.name.trim().to_string(),
            unit_type: input.unit_type,
            base_value: input.value,
            created_at: now,
            updated_at: now,
        };

        debug!(
            id = %lesson_type.id,
            name = %lesson_type.name,
            base_value = %lesson_type.base_value,
            "Inserting lesson type"
        );

        sqlx::query(
            r#"
            INSERT INTO lesson_types (id, name, unit_type, base_value, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&lesson_type.id)
        .bind(&lesson_type.name)
        .bind(lesson_type.unit_type)
        .bind(lesson_type.base_value.to_string())
        .bind(lesson_type.created_at)
        .bind(lesson_type.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).with_duplicate_value(&lesson_type.name))?;

        Ok(lesson_type)
    }

    /// Replaces a lesson type's name, unit type and base value.
    ///
    /// Existing lessons are revalued on the next read; nothing is stored per lesson.
    pub async fn update(&self, id: &str, input: &NewLessonType) -> DbResult<LessonType> {
        input.validate()?;
        let name = input.name.trim();

        debug!(id = %id, name = %name, base_value = %input.value, "Updating lesson type");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE lesson_types SET
                name = ?2,
                unit_type = ?3,
                base_value = ?4,
                updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(input.unit_type)
        .bind(input.value.to_string())
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(|e| DbError::from(e).with_duplicate_value(name))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("LessonType", id));
        }

        let lesson_type = fetch_one(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("LessonType", id))?;

        tx.commit().await?;
        Ok(lesson_type)
    }

    /// Deletes a lesson type, its overrides, and detaches the lessons using it.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting lesson type");

        let result = sqlx::query("DELETE FROM lesson_types WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("LessonType", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use rust_decimal_macros::dec;

    fn hour(value: rust_decimal::Decimal) -> NewLessonType {
        NewLessonType {
            name: "Hour".to_string(),
            unit_type: UnitType::Hour,
            value,
        }
    }

    #[tokio::test]
    async fn test_create_keeps_exact_decimal() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.lesson_types();

        let created = repo.create(&hour(dec!(33.33))).await.unwrap();
        let loaded = repo.get_by_id(&created.id).await.unwrap().unwrap();

        assert_eq!(loaded.base_value, dec!(33.33));
        assert_eq!(loaded.unit_type, UnitType::Hour);
        assert_eq!(loaded.name, "Hour");
    }

    #[tokio::test]
    async fn test_negative_base_value_is_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.lesson_types().create(&hour(dec!(-1))).await.unwrap_err();
        assert!(matches!(err, DbError::BadValue(_)));
    }

    #[tokio::test]
    async fn test_duplicate_name_is_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.lesson_types();

        repo.create(&hour(dec!(50))).await.unwrap();
        let err = repo.create(&hour(dec!(60))).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_update() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.lesson_types();

        let created = repo.create(&hour(dec!(50))).await.unwrap();
        let updated = repo
            .update(
                &created.id,
                &NewLessonType {
                    name: "Workbook".to_string(),
                    unit_type: UnitType::Unit,
                    value: dec!(12.5),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Workbook");
        assert_eq!(updated.unit_type, UnitType::Unit);
        assert_eq!(updated.base_value, dec!(12.5));

        let err = repo.update("missing", &hour(dec!(1))).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.lesson_types();

        let created = repo.create(&hour(dec!(50))).await.unwrap();
        repo.delete(&created.id).await.unwrap();

        assert!(repo.get_by_id(&created.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(&created.id).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }
}

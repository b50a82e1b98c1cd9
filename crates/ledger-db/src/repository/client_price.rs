//! # Client Price Repository
//!
//! Per-client price overrides (`client_lesson_types`).
//!
//! ## Upsert
//! ```text
//! set_client_price(client, type, value)
//!     │
//!     ├── client missing?      → NotFound (nothing written)
//!     ├── lesson type missing? → NotFound (nothing written)
//!     ▼
//! INSERT ... ON CONFLICT (client_id, lesson_type_id)
//!            DO UPDATE SET value = excluded.value
//!     │
//!     ▼
//! exactly one row per (client, type), holding the latest value
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{SqliteExecutor, SqlitePool};
use tracing::debug;

use super::{exists, generate_id, parse_decimal};
use crate::error::{DbError, DbResult};
use ledger_core::validation::validate_price;
use ledger_core::ClientLessonType;

const COLUMNS: &str = "id, client_id, lesson_type_id, value, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct ClientPriceRow {
    id: String,
    client_id: String,
    lesson_type_id: String,
    value: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ClientPriceRow> for ClientLessonType {
    type Error = DbError;

    fn try_from(row: ClientPriceRow) -> DbResult<Self> {
        Ok(ClientLessonType {
            value: parse_decimal("client_lesson_types.value", &row.value)?,
            id: row.id,
            client_id: row.client_id,
            lesson_type_id: row.lesson_type_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub(crate) async fn fetch_all<'e>(
    executor: impl SqliteExecutor<'e>,
) -> DbResult<Vec<ClientLessonType>> {
    let sql = format!("SELECT {COLUMNS} FROM client_lesson_types ORDER BY rowid");
    let rows = sqlx::query_as::<_, ClientPriceRow>(&sql)
        .fetch_all(executor)
        .await?;

    rows.into_iter().map(ClientLessonType::try_from).collect()
}

pub(crate) async fn fetch_for_client<'e>(
    executor: impl SqliteExecutor<'e>,
    client_id: &str,
) -> DbResult<Vec<ClientLessonType>> {
    let sql = format!("SELECT {COLUMNS} FROM client_lesson_types WHERE client_id = ?1 ORDER BY rowid");
    let rows = sqlx::query_as::<_, ClientPriceRow>(&sql)
        .bind(client_id)
        .fetch_all(executor)
        .await?;

    rows.into_iter().map(ClientLessonType::try_from).collect()
}

async fn fetch_pair<'e>(
    executor: impl SqliteExecutor<'e>,
    client_id: &str,
    lesson_type_id: &str,
) -> DbResult<Option<ClientLessonType>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM client_lesson_types WHERE client_id = ?1 AND lesson_type_id = ?2"
    );
    let row = sqlx::query_as::<_, ClientPriceRow>(&sql)
        .bind(client_id)
        .bind(lesson_type_id)
        .fetch_optional(executor)
        .await?;

    row.map(ClientLessonType::try_from).transpose()
}

/// Repository for client price overrides.
#[derive(Debug, Clone)]
pub struct ClientPriceRepository {
    pool: SqlitePool,
}

impl ClientPriceRepository {
    /// Creates a new ClientPriceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ClientPriceRepository { pool }
    }

    /// Lists a client's overrides.
    pub async fn list_for_client(&self, client_id: &str) -> DbResult<Vec<ClientLessonType>> {
        fetch_for_client(&self.pool, client_id).await
    }

    /// Creates or overwrites the client's price for a lesson type.
    ///
    /// Callers holding an untyped JSON value parse it with
    /// [`ledger_core::validation::parse_price`] first; negative values are
    /// rejected here as well.
    ///
    /// ## Returns
    /// * `Ok(ClientLessonType)` - The stored override (same id on overwrite)
    /// * `Err(DbError::NotFound)` - Client or lesson type doesn't exist
    /// * `Err(DbError::BadValue)` - Negative value
    pub async fn set_client_price(
        &self,
        client_id: &str,
        lesson_type_id: &str,
        value: Decimal,
    ) -> DbResult<ClientLessonType> {
        validate_price("value", value)?;

        debug!(
            client_id = %client_id,
            lesson_type_id = %lesson_type_id,
            value = %value,
            "Upserting client price"
        );

        let mut tx = self.pool.begin().await?;

        if !exists(&mut *tx, "clients", client_id).await? {
            return Err(DbError::not_found("Client", client_id));
        }
        if !exists(&mut *tx, "lesson_types", lesson_type_id).await? {
            return Err(DbError::not_found("LessonType", lesson_type_id));
        }

        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO client_lesson_types (id, client_id, lesson_type_id, value, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            ON CONFLICT (client_id, lesson_type_id)
            DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(generate_id())
        .bind(client_id)
        .bind(lesson_type_id)
        .bind(value.to_string())
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let stored = fetch_pair(&mut *tx, client_id, lesson_type_id)
            .await?
            .ok_or_else(|| DbError::Internal("override missing after upsert".to_string()))?;

        tx.commit().await?;
        Ok(stored)
    }

    /// Removes the client's override so the base value applies again.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No override for this pair
    pub async fn clear_client_price(&self, client_id: &str, lesson_type_id: &str) -> DbResult<()> {
        debug!(client_id = %client_id, lesson_type_id = %lesson_type_id, "Clearing client price");

        let result = sqlx::query(
            "DELETE FROM client_lesson_types WHERE client_id = ?1 AND lesson_type_id = ?2",
        )
        .bind(client_id)
        .bind(lesson_type_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(
                "ClientLessonType",
                format!("{client_id}/{lesson_type_id}"),
            ));
        }

        Ok(())
    }
}

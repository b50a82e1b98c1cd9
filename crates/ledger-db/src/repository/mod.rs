//! # Repository Module
//!
//! Database repository implementations for ProjectLedger.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repositories                                         │
//! │                                                                         │
//! │  HTTP handler                                                           │
//! │       │                                                                 │
//! │       │  db.courses().create(&input)                                    │
//! │       ▼                                                                 │
//! │  CourseRepository ── begin ─► client exists? ─► INSERT ─► commit        │
//! │                                    │                                    │
//! │                                    └─ no ─► InvalidParent (rollback)    │
//! │                                                                         │
//! │  LedgerRepository ── one read transaction ─► Ledger snapshot            │
//! │                                                   │                     │
//! │                                                   ▼                     │
//! │                                   ledger-core reports / catalog         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Mutations that check a parent before writing run inside one
//! `sqlx::Transaction`; dropping the transaction on an error path rolls it
//! back and returns the connection to the pool.
//!
//! ## Available Repositories
//!
//! - [`client::ClientRepository`] - Client CRUD (cascading delete)
//! - [`lesson_type::LessonTypeRepository`] - Lesson type CRUD
//! - [`course::CourseRepository`] - Course CRUD
//! - [`lesson::LessonRepository`] - Lesson CRUD
//! - [`client_price::ClientPriceRepository`] - Per-client price overrides
//! - [`ledger::LedgerRepository`] - Snapshots, valuation and reports

pub mod client;
pub mod client_price;
pub mod course;
pub mod ledger;
pub mod lesson;
pub mod lesson_type;

use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::SqliteExecutor;
use uuid::Uuid;

use crate::error::{DbError, DbResult};

/// Generates a new record ID.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Parses a decimal column stored as TEXT.
pub(crate) fn parse_decimal(column: &str, raw: &str) -> DbResult<Decimal> {
    Decimal::from_str(raw).map_err(|_| DbError::CorruptValue {
        column: column.to_string(),
        value: raw.to_string(),
    })
}

/// Whether a row with this id exists. `table` is always a literal.
pub(crate) async fn exists<'e>(
    executor: impl SqliteExecutor<'e>,
    table: &'static str,
    id: &str,
) -> DbResult<bool> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1)");
    let found: i64 = sqlx::query_scalar(&sql)
        .bind(id)
        .fetch_one(executor)
        .await?;

    Ok(found != 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("value", "42.50").unwrap(), dec!(42.50));
        assert_eq!(parse_decimal("value", "0").unwrap(), Decimal::ZERO);

        let err = parse_decimal("lessons.quantity", "abc").unwrap_err();
        assert!(matches!(err, DbError::CorruptValue { .. }));
    }

    #[test]
    fn test_generate_id_is_unique() {
        assert_ne!(generate_id(), generate_id());
        assert_eq!(generate_id().len(), 36);
    }
}

//! # ledger-db: Database Layer for ProjectLedger
//!
//! The entity store: SQLite through sqlx, plus the snapshot loading that feeds
//! `ledger-core`'s pricing and reports.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ProjectLedger Data Flow                          │
//! │                                                                         │
//! │  HTTP handler (GET /clients/{id}/report)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                     ledger-db (THIS CRATE)                      │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐    │    │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │    │    │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │    │    │
//! │  │   │               │    │ ClientRepo    │    │              │    │    │
//! │  │   │ SqlitePool    │◄───│ CourseRepo    │    │ 001_initial_ │    │    │
//! │  │   │               │    │ LessonRepo    │    │   schema.sql │    │    │
//! │  │   │               │    │ LedgerRepo ───┼──► ledger-core    │    │    │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘    │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (LEDGER_DATABASE_PATH)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ledger_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./ledger.db")).await?;
//! let report = db.ledger().client_report(&client_id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::client::ClientRepository;
pub use repository::client_price::ClientPriceRepository;
pub use repository::course::CourseRepository;
pub use repository::ledger::LedgerRepository;
pub use repository::lesson::LessonRepository;
pub use repository::lesson_type::LessonTypeRepository;

//! # ledger-core: Pure Business Logic for ProjectLedger
//!
//! This crate is the pricing and reporting engine. Everything here is a pure
//! function over plain records: no database, no network, no logging sinks.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      ProjectLedger Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Frontend (React, VITE_API_URL)                  │   │
//! │  │    Clients ──► Courses ──► Lessons ──► Types ──► Reports       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP/JSON                              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    ledger-api (axum routes)                     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                ledger-db (SQLite repositories)                  │   │
//! │  │        loads a Ledger snapshot inside one transaction           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Ledger                                 │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ ledger-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  pricing  │  │  report   │  │  catalog  │  │ validation│  │   │
//! │  │   │ PriceBook │  │  Course/  │  │  merged   │  │   rules   │  │   │
//! │  │   │ valuation │  │  Client   │  │  catalog  │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entity records (Client, LessonType, Course, Lesson, overrides)
//! - [`ledger`] - Snapshot of the records a report needs
//! - [`pricing`] - Effective unit price resolution and lesson valuation
//! - [`report`] - Course and client aggregation
//! - [`catalog`] - Base/override merged price catalog per client
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use ledger_core::{Ledger, PriceBook};
//!
//! let ledger = Ledger::default();
//! let book = PriceBook::from_ledger(&ledger);
//! assert!(book.is_empty());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod ledger;
pub mod pricing;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

use rust_decimal::Decimal;

pub use catalog::{merged_catalog, CatalogEntry};
pub use error::{CoreError, CoreResult, ValidationError};
pub use ledger::Ledger;
pub use pricing::PriceBook;
pub use report::{ClientCourseSummary, ClientReport, CourseReport};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Status given to a lesson created without one.
pub const DEFAULT_LESSON_STATUS: &str = "Not started";

/// Maximum length of any entity name.
pub const MAX_NAME_LEN: usize = 200;

/// Maximum length of a lesson status.
pub const MAX_STATUS_LEN: usize = 50;

/// Largest quantity (hours or units) a single lesson may carry.
pub const MAX_QUANTITY: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

/// Largest base value or override a lesson type may carry.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

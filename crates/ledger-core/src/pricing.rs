//! # Pricing Module
//!
//! Effective unit price resolution and lesson valuation.
//!
//! ## Resolution Chain
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  resolve_unit_price(lesson)                                             │
//! │                                                                         │
//! │  lesson.course_id ──► course.client_id                                  │
//! │       │                    │                                            │
//! │       │ (course unknown)   ▼                                            │
//! │       │        overrides[(client_id, lesson.type_id)] ── found ──► value│
//! │       │                    │                                            │
//! │       │                    │ none                                       │
//! │       ▼                    ▼                                            │
//! │  base_values[lesson.type_id] ── found ──► base value                    │
//! │       │                                                                 │
//! │       │ (type unknown or deleted)                                       │
//! │       ▼                                                                 │
//! │       0                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Any break in the chain falls back to zero instead of failing: a billing
//! report always produces a number. Products and sums saturate at
//! `Decimal::MAX` for rows that never went through validation.
//!
//! ## Example
//! ```rust
//! use ledger_core::PriceBook;
//! use rust_decimal::Decimal;
//!
//! let mut book = PriceBook::new();
//! book.insert_base_value("hour", Decimal::new(50, 0));
//! book.insert_course("intro", "acme");
//! book.insert_override("acme", "hour", Decimal::new(40, 0));
//!
//! assert_eq!(book.unit_price("intro", Some("hour")), Decimal::new(40, 0));
//! assert_eq!(book.unit_price("unknown-course", Some("hour")), Decimal::new(50, 0));
//! assert_eq!(book.unit_price("intro", None), Decimal::ZERO);
//! ```

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::ledger::Ledger;
use crate::types::{Lesson, LessonView};

// =============================================================================
// Price Book
// =============================================================================

/// Lookup tables for effective unit prices.
///
/// Overrides are keyed by client id, then lesson type id, so a lookup is two
/// hash probes regardless of how many overrides a client has.
#[derive(Debug, Clone, Default)]
pub struct PriceBook {
    base_values: HashMap<String, Decimal>,
    overrides: HashMap<String, HashMap<String, Decimal>>,
    course_clients: HashMap<String, String>,
}

impl PriceBook {
    /// Creates an empty price book. Every lesson prices at zero.
    pub fn new() -> Self {
        PriceBook::default()
    }

    /// Builds the price book for every record in a ledger snapshot.
    pub fn from_ledger(ledger: &Ledger) -> Self {
        let mut book = PriceBook::new();

        for lesson_type in &ledger.lesson_types {
            book.insert_base_value(&lesson_type.id, lesson_type.base_value);
        }
        for course in &ledger.courses {
            book.insert_course(&course.id, &course.client_id);
        }
        for price in &ledger.client_prices {
            book.insert_override(&price.client_id, &price.lesson_type_id, price.value);
        }

        book
    }

    /// Registers a lesson type's base value.
    pub fn insert_base_value(&mut self, lesson_type_id: &str, value: Decimal) {
        self.base_values.insert(lesson_type_id.to_string(), value);
    }

    /// Registers which client owns a course.
    pub fn insert_course(&mut self, course_id: &str, client_id: &str) {
        self.course_clients
            .insert(course_id.to_string(), client_id.to_string());
    }

    /// Registers a client-specific price, replacing any previous one for the pair.
    pub fn insert_override(&mut self, client_id: &str, lesson_type_id: &str, value: Decimal) {
        self.overrides
            .entry(client_id.to_string())
            .or_default()
            .insert(lesson_type_id.to_string(), value);
    }

    /// True when nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.base_values.is_empty() && self.overrides.is_empty() && self.course_clients.is_empty()
    }

    /// The client's override for a lesson type, if any.
    pub fn client_price(&self, client_id: &str, lesson_type_id: &str) -> Option<Decimal> {
        self.overrides
            .get(client_id)
            .and_then(|prices| prices.get(lesson_type_id))
            .copied()
    }

    /// The lesson type's base value, if the type is known.
    pub fn base_value(&self, lesson_type_id: &str) -> Option<Decimal> {
        self.base_values.get(lesson_type_id).copied()
    }

    /// Effective unit price for a lesson identified by its course and type.
    pub fn unit_price(&self, course_id: &str, lesson_type_id: Option<&str>) -> Decimal {
        let Some(lesson_type_id) = lesson_type_id else {
            return Decimal::ZERO;
        };

        self.course_clients
            .get(course_id)
            .and_then(|client_id| self.client_price(client_id, lesson_type_id))
            .or_else(|| self.base_value(lesson_type_id))
            .unwrap_or(Decimal::ZERO)
    }

    /// Effective unit price of a lesson: client override, else base value, else zero.
    pub fn resolve_unit_price(&self, lesson: &Lesson) -> Decimal {
        self.unit_price(&lesson.course_id, lesson.lesson_type_id.as_deref())
    }

    /// Billable value of a lesson: `quantity * resolve_unit_price(lesson)`.
    ///
    /// No rounding; callers round for display.
    pub fn total_value(&self, lesson: &Lesson) -> Decimal {
        lesson.quantity.saturating_mul(self.resolve_unit_price(lesson))
    }

    /// A lesson with its resolved unit and total values.
    pub fn value_lesson(&self, lesson: &Lesson) -> LessonView {
        let unit_value = self.resolve_unit_price(lesson);

        LessonView {
            id: lesson.id.clone(),
            name: lesson.name.clone(),
            quantity: lesson.quantity,
            status: lesson.status.clone(),
            course_id: lesson.course_id.clone(),
            type_id: lesson.lesson_type_id.clone(),
            unit_value,
            total_value: lesson.quantity.saturating_mul(unit_value),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

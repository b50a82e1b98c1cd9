//! # Domain Types
//!
//! Entity records and request inputs used throughout ProjectLedger.
//!
//! ## Entity Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐ owns  ┌─────────────────┐ owns  ┌──────────────┐  │
//! │  │     Client      │──────►│     Course      │──────►│    Lesson    │  │
//! │  │  ─────────────  │       │  ─────────────  │       │ ──────────── │  │
//! │  │  id (UUID)      │       │  id (UUID)      │       │ id (UUID)    │  │
//! │  │  name (unique)  │       │  client_id (FK) │       │ course_id    │  │
//! │  └────────┬────────┘       └─────────────────┘       │ type_id ─────┼─┐│
//! │           │ owns                                     │ quantity     │ ││
//! │           ▼                                          │ status       │ ││
//! │  ┌─────────────────┐  references  ┌──────────────┐   └──────────────┘ ││
//! │  │ClientLessonType │─────────────►│  LessonType  │◄───────────────────┘│
//! │  │  (override)     │              │ ──────────── │                     │
//! │  │  value          │              │ unit_type    │                     │
//! │  └─────────────────┘              │ base value   │                     │
//! │                                   └──────────────┘                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Records reference each other by id only. There is no embedded object graph,
//! so nothing here can form a cycle.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::validation::{
    validate_name, validate_price, validate_quantity, validate_status, ValidationResult,
};
use crate::DEFAULT_LESSON_STATUS;

// =============================================================================
// Unit Type
// =============================================================================

/// How a lesson type is billed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    /// Billed per hour taught.
    Hour,
    /// Billed per delivered unit (a workbook, an exam, ...).
    Unit,
}

impl Default for UnitType {
    fn default() -> Self {
        UnitType::Hour
    }
}

// =============================================================================
// Client
// =============================================================================

/// A customer that contracts courses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Client {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name. Unique across clients.
    pub name: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Lesson Type
// =============================================================================

/// A billable kind of lesson with its base (catalog) rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LessonType {
    pub id: String,

    /// Unique across lesson types.
    pub name: String,

    pub unit_type: UnitType,

    /// Price of one hour/unit when the client has no override.
    #[serde(rename = "value")]
    #[ts(type = "number")]
    pub base_value: Decimal,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Client Lesson Type (price override)
// =============================================================================

/// A client-specific price for one lesson type.
///
/// At most one exists per (client, lesson type) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClientLessonType {
    pub id: String,
    pub client_id: String,
    pub lesson_type_id: String,
    #[ts(type = "number")]
    pub value: Decimal,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Course
// =============================================================================

/// A course contracted by exactly one client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub client_id: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Lesson
// =============================================================================

/// A lesson within a course, billed by its lesson type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Lesson {
    pub id: String,
    pub name: String,

    /// Hours or units delivered.
    #[ts(type = "number")]
    pub quantity: Decimal,

    /// Free-form progress label ("Not started", "Done", ...).
    pub status: String,

    pub course_id: String,

    /// Lesson type used for pricing.
    ///
    /// `None` once the lesson type has been deleted; the lesson then prices at zero.
    #[serde(rename = "type_id")]
    pub lesson_type_id: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// A lesson together with its resolved prices.
///
/// Produced by [`crate::PriceBook::value_lesson`]; never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LessonView {
    pub id: String,
    pub name: String,
    #[ts(type = "number")]
    pub quantity: Decimal,
    pub status: String,
    pub course_id: String,
    pub type_id: Option<String>,
    /// Effective unit price (override or base value).
    #[ts(type = "number")]
    pub unit_value: Decimal,
    /// `quantity * unit_value`, unrounded.
    #[ts(type = "number")]
    pub total_value: Decimal,
}

/// A course with its valued lessons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CourseDetail {
    pub id: String,
    pub name: String,
    pub client_id: String,
    pub lessons: Vec<LessonView>,
}

// =============================================================================
// Inputs
// =============================================================================

/// Payload for creating or renaming a client.
///
/// Clients only carry a name, so the same payload serves both.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewClient {
    pub name: String,
}

impl NewClient {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name)
    }
}

/// Payload for renaming a course.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rename {
    pub name: String,
}

impl Rename {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name)
    }
}

/// Payload for creating or replacing a lesson type.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewLessonType {
    pub name: String,

    #[serde(default)]
    pub unit_type: UnitType,

    /// Base value.
    #[ts(type = "number")]
    pub value: Decimal,
}

impl NewLessonType {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name)?;
        validate_price("value", self.value)
    }
}

/// Payload for creating a course.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewCourse {
    pub name: String,
    pub client_id: String,
}

impl NewCourse {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name)
    }
}

fn default_quantity() -> Decimal {
    Decimal::ONE
}

fn default_status() -> String {
    DEFAULT_LESSON_STATUS.to_string()
}

/// Payload for creating a lesson.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewLesson {
    pub name: String,

    #[serde(default = "default_quantity")]
    #[ts(type = "number")]
    pub quantity: Decimal,

    #[serde(default = "default_status")]
    pub status: String,

    pub course_id: String,

    pub type_id: String,
}

impl NewLesson {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name)?;
        validate_quantity(self.quantity)?;
        validate_status(&self.status)
    }
}

/// Payload for editing a lesson. The owning course never changes.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LessonUpdate {
    pub name: String,

    #[serde(default = "default_quantity")]
    #[ts(type = "number")]
    pub quantity: Decimal,

    #[serde(default = "default_status")]
    pub status: String,

    pub type_id: String,
}

impl LessonUpdate {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name)?;
        validate_quantity(self.quantity)?;
        validate_status(&self.status)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Report Module
//!
//! Rolls lesson valuations up into course and client summaries.
//!
//! ## Aggregation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Client "Acme"                                   ClientReport           │
//! │  ├── Course "English"                            ├── courses_count: 2   │
//! │  │   ├── Lesson  3h × 40  = 120  ─┐              ├── lessons_count: 3   │
//! │  │   └── Lesson  1h × 40  =  40  ─┼─► 160 ─┐     └── total_value: 185   │
//! │  └── Course "Exams"                │        ├──►                         │
//! │      └── Lesson  1u × 25  =  25  ─┴─►  25 ─┘                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A client's total is the sum of its course totals; a course total is the sum
//! of its lessons' `total_value`. Empty courses contribute zero.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::ledger::Ledger;
use crate::pricing::PriceBook;
use crate::types::{Client, Course, CourseDetail, Lesson, LessonView};

// =============================================================================
// Report Types
// =============================================================================

/// Billing summary for one course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CourseReport {
    pub course_id: String,
    pub course_name: String,
    #[ts(type = "number")]
    pub total_value: Decimal,
    pub lessons_count: usize,
}

/// Billing summary for one client across all its courses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClientReport {
    pub client_id: String,
    pub client_name: String,
    #[ts(type = "number")]
    pub total_value: Decimal,
    pub courses_count: usize,
    pub lessons_count: usize,
}

/// One row of a client's course list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClientCourseSummary {
    #[serde(rename = "id")]
    pub course_id: String,
    pub name: String,
    pub lessons_count: usize,
    #[ts(type = "number")]
    pub total_value: Decimal,
}

// =============================================================================
// Aggregation
// =============================================================================

#[derive(Debug, Clone, Copy, Default)]
struct Totals {
    lessons_count: usize,
    total_value: Decimal,
}

impl Totals {
    fn of<'a>(book: &PriceBook, lessons: impl IntoIterator<Item = &'a Lesson>) -> Self {
        lessons.into_iter().fold(Totals::default(), |acc, lesson| Totals {
            lessons_count: acc.lessons_count + 1,
            total_value: acc.total_value.saturating_add(book.total_value(lesson)),
        })
    }
}

/// Lessons grouped by course id, built once per bulk report.
struct LessonIndex<'a> {
    by_course: HashMap<&'a str, Vec<&'a Lesson>>,
}

impl<'a> LessonIndex<'a> {
    fn new(ledger: &'a Ledger) -> Self {
        let mut by_course: HashMap<&str, Vec<&Lesson>> = HashMap::new();
        for lesson in &ledger.lessons {
            by_course
                .entry(lesson.course_id.as_str())
                .or_default()
                .push(lesson);
        }
        LessonIndex { by_course }
    }

    fn lessons(&self, course_id: &str) -> &[&'a Lesson] {
        self.by_course.get(course_id).map(Vec::as_slice).unwrap_or(&[])
    }

    fn totals(&self, book: &PriceBook, course_id: &str) -> Totals {
        Totals::of(book, self.lessons(course_id).iter().copied())
    }
}

fn build_course_report(course: &Course, totals: Totals) -> CourseReport {
    CourseReport {
        course_id: course.id.clone(),
        course_name: course.name.clone(),
        total_value: totals.total_value,
        lessons_count: totals.lessons_count,
    }
}

fn build_client_report(
    ledger: &Ledger,
    book: &PriceBook,
    index: &LessonIndex<'_>,
    client: &Client,
) -> ClientReport {
    let mut report = ClientReport {
        client_id: client.id.clone(),
        client_name: client.name.clone(),
        total_value: Decimal::ZERO,
        courses_count: 0,
        lessons_count: 0,
    };

    for course in ledger.courses_of(&client.id) {
        let totals = index.totals(book, &course.id);
        report.courses_count += 1;
        report.lessons_count += totals.lessons_count;
        report.total_value = report.total_value.saturating_add(totals.total_value);
    }

    report
}

// =============================================================================
// Operations
// =============================================================================

/// Lesson count and total value of one course.
///
/// ## Errors
/// `CoreError::NotFound` when the course is not in the snapshot.
pub fn course_report(ledger: &Ledger, course_id: &str) -> CoreResult<CourseReport> {
    let course = ledger
        .course(course_id)
        .ok_or_else(|| CoreError::not_found("Course", course_id))?;
    let book = PriceBook::from_ledger(ledger);
    let totals = Totals::of(&book, ledger.lessons_of(course_id));

    Ok(build_course_report(course, totals))
}

/// Course count, lesson count and total value of one client.
///
/// ## Errors
/// `CoreError::NotFound` when the client is not in the snapshot.
pub fn client_report(ledger: &Ledger, client_id: &str) -> CoreResult<ClientReport> {
    let client = ledger
        .client(client_id)
        .ok_or_else(|| CoreError::not_found("Client", client_id))?;
    let book = PriceBook::from_ledger(ledger);
    let index = LessonIndex::new(ledger);

    Ok(build_client_report(ledger, &book, &index, client))
}

/// One report per course in the snapshot, in store order.
pub fn all_course_reports(ledger: &Ledger) -> Vec<CourseReport> {
    let book = PriceBook::from_ledger(ledger);
    let index = LessonIndex::new(ledger);

    ledger
        .courses
        .iter()
        .map(|course| build_course_report(course, index.totals(&book, &course.id)))
        .collect()
}

/// One report per client in the snapshot, in store order.
pub fn all_client_reports(ledger: &Ledger) -> Vec<ClientReport> {
    let book = PriceBook::from_ledger(ledger);
    let index = LessonIndex::new(ledger);

    ledger
        .clients
        .iter()
        .map(|client| build_client_report(ledger, &book, &index, client))
        .collect()
}

/// Per-course lesson count and total value for one client.
///
/// ## Errors
/// `CoreError::NotFound` when the client is not in the snapshot.
pub fn client_courses_summary(
    ledger: &Ledger,
    client_id: &str,
) -> CoreResult<Vec<ClientCourseSummary>> {
    if ledger.client(client_id).is_none() {
        return Err(CoreError::not_found("Client", client_id));
    }
    let book = PriceBook::from_ledger(ledger);
    let index = LessonIndex::new(ledger);

    Ok(ledger
        .courses_of(client_id)
        .map(|course| {
            let totals = index.totals(&book, &course.id);
            ClientCourseSummary {
                course_id: course.id.clone(),
                name: course.name.clone(),
                lessons_count: totals.lessons_count,
                total_value: totals.total_value,
            }
        })
        .collect())
}

// =============================================================================
// Detail Views
// =============================================================================

/// Every lesson in the snapshot with its unit and total value, in store order.
pub fn valued_lessons(ledger: &Ledger) -> Vec<LessonView> {
    let book = PriceBook::from_ledger(ledger);
    ledger.lessons.iter().map(|l| book.value_lesson(l)).collect()
}

/// A course with its valued lessons.
///
/// ## Errors
/// `CoreError::NotFound` when the course is not in the snapshot.
pub fn course_detail(ledger: &Ledger, course_id: &str) -> CoreResult<CourseDetail> {
    let course = ledger
        .course(course_id)
        .ok_or_else(|| CoreError::not_found("Course", course_id))?;
    let book = PriceBook::from_ledger(ledger);

    Ok(CourseDetail {
        id: course.id.clone(),
        name: course.name.clone(),
        client_id: course.client_id.clone(),
        lessons: ledger
            .lessons_of(course_id)
            .map(|l| book.value_lesson(l))
            .collect(),
    })
}

/// Every course with its valued lessons, in store order.
pub fn course_details(ledger: &Ledger) -> Vec<CourseDetail> {
    let book = PriceBook::from_ledger(ledger);
    let index = LessonIndex::new(ledger);

    ledger
        .courses
        .iter()
        .map(|course| CourseDetail {
            id: course.id.clone(),
            name: course.name.clone(),
            client_id: course.client_id.clone(),
            lessons: index
                .lessons(&course.id)
                .iter()
                .map(|l| book.value_lesson(l))
                .collect(),
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    use crate::types::{ClientLessonType, LessonType, UnitType};

    struct Fixture {
        ledger: Ledger,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture {
                ledger: Ledger::default(),
            }
        }

        fn client(mut self, id: &str) -> Self {
            let now = Utc::now();
            self.ledger.clients.push(Client {
                id: id.to_string(),
                name: id.to_uppercase(),
                created_at: now,
                updated_at: now,
            });
            self
        }

        fn lesson_type(mut self, id: &str, base: Decimal) -> Self {
            let now = Utc::now();
            self.ledger.lesson_types.push(LessonType {
                id: id.to_string(),
                name: id.to_string(),
                unit_type: UnitType::Hour,
                base_value: base,
                created_at: now,
                updated_at: now,
            });
            self
        }

        fn price(mut self, client_id: &str, type_id: &str, value: Decimal) -> Self {
            let now = Utc::now();
            self.ledger.client_prices.push(ClientLessonType {
                id: format!("{client_id}-{type_id}"),
                client_id: client_id.to_string(),
                lesson_type_id: type_id.to_string(),
                value,
                created_at: now,
                updated_at: now,
            });
            self
        }

        fn course(mut self, id: &str, client_id: &str) -> Self {
            let now = Utc::now();
            self.ledger.courses.push(Course {
                id: id.to_string(),
                name: format!("Course {id}"),
                client_id: client_id.to_string(),
                created_at: now,
                updated_at: now,
            });
            self
        }

        fn lesson(mut self, course_id: &str, type_id: &str, quantity: Decimal) -> Self {
            let now = Utc::now();
            let n = self.ledger.lessons.len();
            self.ledger.lessons.push(Lesson {
                id: format!("l{n}"),
                name: format!("Lesson {n}"),
                quantity,
                status: "Not started".to_string(),
                course_id: course_id.to_string(),
                lesson_type_id: Some(type_id.to_string()),
                created_at: now,
                updated_at: now,
            });
            self
        }
    }

    fn acme() -> Ledger {
        Fixture::new()
            .client("acme")
            .client("globex")
            .lesson_type("hour", dec!(50))
            .lesson_type("exam", dec!(25))
            .price("acme", "hour", dec!(40))
            .course("english", "acme")
            .course("exams", "acme")
            .course("empty", "acme")
            .course("german", "globex")
            .lesson("english", "hour", dec!(3))
            .lesson("english", "hour", dec!(1))
            .lesson("exams", "exam", dec!(1))
            .lesson("german", "hour", dec!(2))
            .ledger
    }

    #[test]
    fn test_overflowing_sums_saturate() {
        let ledger = Fixture::new()
            .client("acme")
            .lesson_type("hour", dec!(50))
            .course("english", "acme")
            .course("german", "acme")
            .lesson("english", "hour", Decimal::MAX)
            .lesson("english", "hour", dec!(1))
            .lesson("german", "hour", Decimal::MAX)
            .ledger;

        let report = course_report(&ledger, "english").unwrap();
        assert_eq!(report.lessons_count, 2);
        assert_eq!(report.total_value, Decimal::MAX);

        let report = client_report(&ledger, "acme").unwrap();
        assert_eq!(report.lessons_count, 3);
        assert_eq!(report.total_value, Decimal::MAX);

        assert_eq!(all_course_reports(&ledger).len(), 2);
        assert_eq!(all_client_reports(&ledger)[0].total_value, Decimal::MAX);
    }

    #[test]
    fn test_course_report_sums_lessons() {
        let report = course_report(&acme(), "english").unwrap();
        assert_eq!(report.course_name, "Course english");
        assert_eq!(report.lessons_count, 2);
        assert_eq!(report.total_value, dec!(160));
    }

    #[test]
    fn test_empty_course_is_zero() {
        let report = course_report(&acme(), "empty").unwrap();
        assert_eq!(report.lessons_count, 0);
        assert_eq!(report.total_value, Decimal::ZERO);
    }

    #[test]
    fn test_unknown_course_is_not_found() {
        let err = course_report(&acme(), "nope").unwrap_err();
        assert!(matches!(err, CoreError::NotFound { entity: "Course", .. }));
    }

    #[test]
    fn test_client_report_sums_courses() {
        let ledger = acme();
        let report = client_report(&ledger, "acme").unwrap();

        assert_eq!(report.client_name, "ACME");
        assert_eq!(report.courses_count, 3);
        assert_eq!(report.lessons_count, 3);
        assert_eq!(report.total_value, dec!(185));

        let course_sum: Decimal = ledger
            .courses_of("acme")
            .map(|c| course_report(&ledger, &c.id).unwrap().total_value)
            .sum();
        assert_eq!(report.total_value, course_sum);
    }

    #[test]
    fn test_other_client_uses_base_value() {
        let report = client_report(&acme(), "globex").unwrap();
        assert_eq!(report.courses_count, 1);
        assert_eq!(report.total_value, dec!(100));
    }

    #[test]
    fn test_unknown_client_is_not_found() {
        assert!(client_report(&acme(), "nope").is_err());
        assert!(client_courses_summary(&acme(), "nope").is_err());
    }

    #[test]
    fn test_bulk_reports_follow_store_order() {
        let ledger = acme();

        let courses = all_course_reports(&ledger);
        let ids: Vec<_> = courses.iter().map(|r| r.course_id.as_str()).collect();
        assert_eq!(ids, ["english", "exams", "empty", "german"]);

        let clients = all_client_reports(&ledger);
        assert_eq!(clients.len(), 2);
        assert_eq!(clients[0].client_id, "acme");
        assert_eq!(clients[0].total_value, dec!(185));
        assert_eq!(clients[1].total_value, dec!(100));
    }

    #[test]
    fn test_bulk_reports_on_empty_store() {
        let ledger = Ledger::default();
        assert!(all_course_reports(&ledger).is_empty());
        assert!(all_client_reports(&ledger).is_empty());
    }

    #[test]
    fn test_client_courses_summary() {
        let summary = client_courses_summary(&acme(), "acme").unwrap();
        assert_eq!(summary.len(), 3);
        assert_eq!(summary[0].course_id, "english");
        assert_eq!(summary[0].lessons_count, 2);
        assert_eq!(summary[0].total_value, dec!(160));
        assert_eq!(summary[2].total_value, Decimal::ZERO);

        let json = serde_json::to_value(&summary[0]).unwrap();
        assert_eq!(json["id"], "english");
    }

    #[test]
    fn test_course_detail_values_each_lesson() {
        let detail = course_detail(&acme(), "english").unwrap();
        assert_eq!(detail.client_id, "acme");
        assert_eq!(detail.lessons.len(), 2);
        assert_eq!(detail.lessons[0].unit_value, dec!(40));
        assert_eq!(detail.lessons[0].total_value, dec!(120));
        assert_eq!(detail.lessons[1].total_value, dec!(40));

        assert!(course_detail(&acme(), "nope").is_err());
    }

    #[test]
    fn test_course_details_match_course_reports() {
        let ledger = acme();
        let details = course_details(&ledger);
        let reports = all_course_reports(&ledger);

        assert_eq!(details.len(), reports.len());
        for (detail, report) in details.iter().zip(&reports) {
            let total: Decimal = detail.lessons.iter().map(|l| l.total_value).sum();
            assert_eq!(detail.id, report.course_id);
            assert_eq!(total, report.total_value);
        }
    }

    #[test]
    fn test_valued_lessons() {
        let lessons = valued_lessons(&acme());
        assert_eq!(lessons.len(), 4);
        assert_eq!(lessons[3].course_id, "german");
        assert_eq!(lessons[3].unit_value, dec!(50));
        assert_eq!(lessons[3].total_value, dec!(100));
    }
}

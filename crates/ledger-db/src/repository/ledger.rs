//! # Ledger Repository
//!
//! Loads [`Ledger`] snapshots and runs the pricing and reporting operations
//! of `ledger-core` over them.
//!
//! ## Snapshot Scope
//! ```text
//! ┌──────────────────────────┬──────────────────────────────────────────────┐
//! │ Operation                │ Loaded in one read transaction               │
//! ├──────────────────────────┼──────────────────────────────────────────────┤
//! │ course_report            │ course, its client's overrides, its lessons, │
//! │ course_detail / lessons  │ lesson types                                 │
//! ├──────────────────────────┼──────────────────────────────────────────────┤
//! │ client_report            │ client, its courses, their lessons, its      │
//! │ client_courses_summary   │ overrides, lesson types                      │
//! │ merged_catalog           │                                              │
//! ├──────────────────────────┼──────────────────────────────────────────────┤
//! │ all_*_reports            │ everything                                   │
//! │ course_details           │                                              │
//! │ valued_lessons           │                                              │
//! └──────────────────────────┴──────────────────────────────────────────────┘
//! ```
//!
//! A missing client or course leaves the snapshot without it, and the core
//! operation reports `NotFound`.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use super::{client, client_price, course, lesson, lesson_type};
use crate::error::{DbError, DbResult};
use ledger_core::report;
use ledger_core::{
    merged_catalog, CatalogEntry, ClientCourseSummary, ClientReport, CourseDetail, CourseReport,
    Ledger, LessonView, PriceBook,
};

/// Repository for valuation and reporting.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: SqlitePool,
}

impl LedgerRepository {
    /// Creates a new LedgerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LedgerRepository { pool }
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    /// Loads every record.
    pub async fn snapshot(&self) -> DbResult<Ledger> {
        let mut tx = self.pool.begin().await?;

        let ledger = Ledger {
            clients: client::fetch_all(&mut *tx).await?,
            lesson_types: lesson_type::fetch_all(&mut *tx).await?,
            client_prices: client_price::fetch_all(&mut *tx).await?,
            courses: course::fetch_all(&mut *tx).await?,
            lessons: lesson::fetch_all(&mut *tx).await?,
        };

        tx.commit().await?;

        debug!(
            clients = ledger.clients.len(),
            courses = ledger.courses.len(),
            lessons = ledger.lessons.len(),
            "Loaded full snapshot"
        );
        Ok(ledger)
    }

    /// Loads one client with everything needed to value its lessons.
    pub async fn client_snapshot(&self, client_id: &str) -> DbResult<Ledger> {
        let mut tx = self.pool.begin().await?;

        let Some(found) = client::fetch_one(&mut *tx, client_id).await? else {
            return Ok(Ledger::default());
        };

        let ledger = Ledger {
            clients: vec![found],
            lesson_types: lesson_type::fetch_all(&mut *tx).await?,
            client_prices: client_price::fetch_for_client(&mut *tx, client_id).await?,
            courses: course::fetch_for_client(&mut *tx, client_id).await?,
            lessons: lesson::fetch_for_client(&mut *tx, client_id).await?,
        };

        tx.commit().await?;

        debug!(
            client_id = %client_id,
            courses = ledger.courses.len(),
            lessons = ledger.lessons.len(),
            "Loaded client snapshot"
        );
        Ok(ledger)
    }

    /// Loads one course with everything needed to value its lessons.
    pub async fn course_snapshot(&self, course_id: &str) -> DbResult<Ledger> {
        let mut tx = self.pool.begin().await?;
        let ledger = load_course(&mut *tx, course_id).await?;
        tx.commit().await?;

        debug!(
            course_id = %course_id,
            lessons = ledger.lessons.len(),
            "Loaded course snapshot"
        );
        Ok(ledger)
    }

    // =========================================================================
    // Valuation
    // =========================================================================

    /// One lesson with its effective unit price and total value.
    ///
    /// The lesson's course is looked up in the same transaction as the
    /// snapshot, so a concurrent delete yields `NotFound`, never a stale value.
    pub async fn valued_lesson(&self, lesson_id: &str) -> DbResult<LessonView> {
        let mut tx = self.pool.begin().await?;

        let course_id: Option<String> =
            sqlx::query_scalar("SELECT course_id FROM lessons WHERE id = ?1")
                .bind(lesson_id)
                .fetch_optional(&mut *tx)
                .await?;
        let course_id = course_id.ok_or_else(|| DbError::not_found("Lesson", lesson_id))?;

        let ledger = load_course(&mut *tx, &course_id).await?;
        tx.commit().await?;

        let lesson = ledger
            .lessons
            .iter()
            .find(|l| l.id == lesson_id)
            .ok_or_else(|| DbError::not_found("Lesson", lesson_id))?;

        Ok(PriceBook::from_ledger(&ledger).value_lesson(lesson))
    }

    /// Every lesson with its effective unit price and total value.
    pub async fn valued_lessons(&self) -> DbResult<Vec<LessonView>> {
        Ok(report::valued_lessons(&self.snapshot().await?))
    }

    /// A course's lessons with their values.
    pub async fn course_lessons(&self, course_id: &str) -> DbResult<Vec<LessonView>> {
        Ok(self.course_detail(course_id).await?.lessons)
    }

    /// A course with its valued lessons.
    pub async fn course_detail(&self, course_id: &str) -> DbResult<CourseDetail> {
        let ledger = self.course_snapshot(course_id).await?;
        Ok(report::course_detail(&ledger, course_id)?)
    }

    /// Every course with its valued lessons.
    pub async fn course_details(&self) -> DbResult<Vec<CourseDetail>> {
        Ok(report::course_details(&self.snapshot().await?))
    }

    // =========================================================================
    // Reports
    // =========================================================================

    pub async fn course_report(&self, course_id: &str) -> DbResult<CourseReport> {
        let ledger = self.course_snapshot(course_id).await?;
        Ok(report::course_report(&ledger, course_id)?)
    }

    pub async fn client_report(&self, client_id: &str) -> DbResult<ClientReport> {
        let ledger = self.client_snapshot(client_id).await?;
        Ok(report::client_report(&ledger, client_id)?)
    }

    pub async fn all_course_reports(&self) -> DbResult<Vec<CourseReport>> {
        Ok(report::all_course_reports(&self.snapshot().await?))
    }

    pub async fn all_client_reports(&self) -> DbResult<Vec<ClientReport>> {
        Ok(report::all_client_reports(&self.snapshot().await?))
    }

    pub async fn client_courses_summary(
        &self,
        client_id: &str,
    ) -> DbResult<Vec<ClientCourseSummary>> {
        let ledger = self.client_snapshot(client_id).await?;
        Ok(report::client_courses_summary(&ledger, client_id)?)
    }

    /// Every lesson type priced for the client.
    pub async fn merged_catalog(&self, client_id: &str) -> DbResult<Vec<CatalogEntry>> {
        let ledger = self.client_snapshot(client_id).await?;
        Ok(merged_catalog(&ledger, client_id)?)
    }
}

/// Reads a course, its client, that client's overrides, every lesson type and
/// the course's lessons. An unknown course yields an empty ledger.
async fn load_course(conn: &mut SqliteConnection, course_id: &str) -> DbResult<Ledger> {
    let Some(found) = course::fetch_one(&mut *conn, course_id).await? else {
        return Ok(Ledger::default());
    };

    Ok(Ledger {
        clients: client::fetch_one(&mut *conn, &found.client_id)
            .await?
            .into_iter()
            .collect(),
        lesson_types: lesson_type::fetch_all(&mut *conn).await?,
        client_prices: client_price::fetch_for_client(&mut *conn, &found.client_id).await?,
        lessons: lesson::fetch_for_course(&mut *conn, course_id).await?,
        courses: vec![found],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use ledger_core::{NewClient, NewCourse, NewLesson, NewLessonType, UnitType};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    async fn database() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn add_client(db: &Database, name: &str) -> String {
        db.clients()
            .create(&NewClient {
                name: name.to_string(),
            })
            .await
            .unwrap()
            .id
    }

    async fn add_type(db: &Database, name: &str, unit_type: UnitType, value: Decimal) -> String {
        db.lesson_types()
            .create(&NewLessonType {
                name: name.to_string(),
                unit_type,
                value,
            })
            .await
            .unwrap()
            .id
    }

    async fn add_course(db: &Database, name: &str, client_id: &str) -> String {
        db.courses()
            .create(&NewCourse {
                name: name.to_string(),
                client_id: client_id.to_string(),
            })
            .await
            .unwrap()
            .id
    }

    async fn add_lesson(db: &Database, course_id: &str, type_id: &str, quantity: Decimal) -> String {
        db.lessons()
            .create(&NewLesson {
                name: "Lesson".to_string(),
                quantity,
                status: "Not started".to_string(),
                course_id: course_id.to_string(),
                type_id: type_id.to_string(),
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_acme_override_example() {
        let db = database().await;
        let acme = add_client(&db, "Acme").await;
        let hour = add_type(&db, "Hour", UnitType::Hour, dec!(50)).await;
        let course = add_course(&db, "English", &acme).await;
        let lesson = add_lesson(&db, &course, &hour, dec!(3)).await;

        let view = db.ledger().valued_lesson(&lesson).await.unwrap();
        assert_eq!(view.unit_value, dec!(50));
        assert_eq!(view.total_value, dec!(150));

        db.client_prices()
            .set_client_price(&acme, &hour, dec!(40))
            .await
            .unwrap();

        let view = db.ledger().valued_lesson(&lesson).await.unwrap();
        assert_eq!(view.unit_value, dec!(40));
        assert_eq!(view.total_value, dec!(120));
        assert_eq!(
            db.ledger().course_report(&course).await.unwrap().total_value,
            dec!(120)
        );
    }

    #[tokio::test]
    async fn test_client_total_is_sum_of_course_totals() {
        let db = database().await;
        let acme = add_client(&db, "Acme").await;
        let hour = add_type(&db, "Hour", UnitType::Hour, dec!(50)).await;
        let exam = add_type(&db, "Exam", UnitType::Unit, dec!(25)).await;
        let english = add_course(&db, "English", &acme).await;
        let exams = add_course(&db, "Exams", &acme).await;
        let empty = add_course(&db, "Empty", &acme).await;
        add_lesson(&db, &english, &hour, dec!(2)).await;
        add_lesson(&db, &english, &hour, dec!(0.5)).await;
        add_lesson(&db, &exams, &exam, dec!(3)).await;

        let ledger = db.ledger();
        let report = ledger.client_report(&acme).await.unwrap();
        assert_eq!(report.courses_count, 3);
        assert_eq!(report.lessons_count, 3);
        assert_eq!(report.total_value, dec!(200));

        let mut course_sum = Decimal::ZERO;
        for id in [&english, &exams, &empty] {
            course_sum += ledger.course_report(id).await.unwrap().total_value;
        }
        assert_eq!(report.total_value, course_sum);

        let empty_report = ledger.course_report(&empty).await.unwrap();
        assert_eq!(empty_report.lessons_count, 0);
        assert_eq!(empty_report.total_value, Decimal::ZERO);

        let summary = ledger.client_courses_summary(&acme).await.unwrap();
        assert_eq!(summary.len(), 3);
        assert_eq!(summary[0].total_value, dec!(125));
    }

    #[tokio::test]
    async fn test_deleting_client_cascades() {
        let db = database().await;
        let acme = add_client(&db, "Acme").await;
        let globex = add_client(&db, "Globex").await;
        let hour = add_type(&db, "Hour", UnitType::Hour, dec!(50)).await;
        let course = add_course(&db, "English", &acme).await;
        add_lesson(&db, &course, &hour, dec!(1)).await;
        let kept = add_course(&db, "German", &globex).await;
        add_lesson(&db, &kept, &hour, dec!(1)).await;
        db.client_prices()
            .set_client_price(&acme, &hour, dec!(40))
            .await
            .unwrap();

        db.clients().delete(&acme).await.unwrap();

        let err = db.ledger().client_report(&acme).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        let snapshot = db.ledger().snapshot().await.unwrap();
        assert!(snapshot.courses.iter().all(|c| c.client_id != acme));
        assert!(snapshot.lessons.iter().all(|l| l.course_id != course));
        assert!(snapshot.client_prices.is_empty());
        assert_eq!(snapshot.courses.len(), 1);
        assert_eq!(snapshot.lessons.len(), 1);
    }

    #[tokio::test]
    async fn test_deleted_lesson_type_prices_at_zero() {
        let db = database().await;
        let acme = add_client(&db, "Acme").await;
        let hour = add_type(&db, "Hour", UnitType::Hour, dec!(50)).await;
        let course = add_course(&db, "English", &acme).await;
        let lesson = add_lesson(&db, &course, &hour, dec!(3)).await;

        db.lesson_types().delete(&hour).await.unwrap();

        let view = db.ledger().valued_lesson(&lesson).await.unwrap();
        assert_eq!(view.type_id, None);
        assert_eq!(view.total_value, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_merged_catalog() {
        let db = database().await;
        let acme = add_client(&db, "Acme").await;
        add_type(&db, "Hour", UnitType::Hour, dec!(50)).await;
        let exam = add_type(&db, "Exam", UnitType::Unit, dec!(25)).await;
        add_type(&db, "Book", UnitType::Unit, dec!(10)).await;
        db.client_prices()
            .set_client_price(&acme, &exam, dec!(20))
            .await
            .unwrap();

        let catalog = db.ledger().merged_catalog(&acme).await.unwrap();
        assert_eq!(catalog.len(), 3);
        let overridden: Vec<_> = catalog.iter().filter(|e| e.client_value.is_some()).collect();
        assert_eq!(overridden.len(), 1);
        assert_eq!(overridden[0].effective_value, dec!(20));

        let err = db.ledger().merged_catalog("ghost").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_bulk_reports() {
        let db = database().await;
        let ledger = db.ledger();
        assert!(ledger.all_client_reports().await.unwrap().is_empty());
        assert!(ledger.all_course_reports().await.unwrap().is_empty());

        let acme = add_client(&db, "Acme").await;
        let globex = add_client(&db, "Globex").await;
        let hour = add_type(&db, "Hour", UnitType::Hour, dec!(50)).await;
        let english = add_course(&db, "English", &acme).await;
        add_course(&db, "German", &globex).await;
        add_lesson(&db, &english, &hour, dec!(2)).await;

        let clients = ledger.all_client_reports().await.unwrap();
        assert_eq!(clients.len(), 2);
        assert_eq!(clients[0].client_id, acme);
        assert_eq!(clients[0].total_value, dec!(100));
        assert_eq!(clients[1].total_value, Decimal::ZERO);

        let courses = ledger.all_course_reports().await.unwrap();
        assert_eq!(courses.len(), 2);

        let details = ledger.course_details().await.unwrap();
        assert_eq!(details[0].lessons.len(), 1);
        assert!(details[1].lessons.is_empty());

        assert_eq!(ledger.valued_lessons().await.unwrap().len(), 1);
        assert_eq!(ledger.course_lessons(&english).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let db = database().await;
        let ledger = db.ledger();

        assert!(matches!(
            ledger.course_report("ghost").await.unwrap_err(),
            DbError::NotFound { .. }
        ));
        assert!(matches!(
            ledger.course_detail("ghost").await.unwrap_err(),
            DbError::NotFound { .. }
        ));
        assert!(matches!(
            ledger.valued_lesson("ghost").await.unwrap_err(),
            DbError::NotFound { .. }
        ));
        assert!(matches!(
            ledger.client_courses_summary("ghost").await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_oversized_stored_quantity_saturates_reports() {
        let db = database().await;
        let acme = add_client(&db, "Acme").await;
        let hour = add_type(&db, "Hour", UnitType::Hour, dec!(50)).await;
        let course = add_course(&db, "English", &acme).await;
        let lesson = add_lesson(&db, &course, &hour, dec!(1)).await;
        add_lesson(&db, &course, &hour, dec!(2)).await;

        // Written behind the validator's back, e.g. by an older build
        sqlx::query("UPDATE lessons SET quantity = ?1 WHERE id = ?2")
            .bind(Decimal::MAX.to_string())
            .bind(&lesson)
            .execute(db.pool())
            .await
            .unwrap();

        let ledger = db.ledger();
        let view = ledger.valued_lesson(&lesson).await.unwrap();
        assert_eq!(view.total_value, Decimal::MAX);
        assert_eq!(
            ledger.course_report(&course).await.unwrap().total_value,
            Decimal::MAX
        );
        assert_eq!(
            ledger.client_report(&acme).await.unwrap().total_value,
            Decimal::MAX
        );
        assert_eq!(ledger.all_course_reports().await.unwrap().len(), 1);
        assert_eq!(ledger.valued_lessons().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_valued_lesson_after_delete() {
        let db = database().await;
        let acme = add_client(&db, "Acme").await;
        let hour = add_type(&db, "Hour", UnitType::Hour, dec!(50)).await;
        let course = add_course(&db, "English", &acme).await;
        let gone = add_lesson(&db, &course, &hour, dec!(1)).await;
        let kept = add_lesson(&db, &course, &hour, dec!(2)).await;

        db.lessons().delete(&gone).await.unwrap();

        let ledger = db.ledger();
        assert!(matches!(
            ledger.valued_lesson(&gone).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
        // The single in-memory connection went back to the pool
        assert_eq!(
            ledger.valued_lesson(&kept).await.unwrap().total_value,
            dec!(100)
        );
    }
}

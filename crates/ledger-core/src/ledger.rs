//! # Ledger Snapshot
//!
//! The set of records a pricing or reporting operation works on.
//!
//! The store fills a `Ledger` inside a single read transaction, scoped to what
//! the request needs (one course, one client, or everything for the bulk
//! reports). The functions in [`crate::report`] and [`crate::catalog`] then run
//! over it without touching the store again.
//!
//! Vectors keep store iteration order; reports preserve that order.

use crate::types::{Client, ClientLessonType, Course, Lesson, LessonType};

/// A point-in-time view of (part of) the entity store.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    pub clients: Vec<Client>,
    pub lesson_types: Vec<LessonType>,
    pub client_prices: Vec<ClientLessonType>,
    pub courses: Vec<Course>,
    pub lessons: Vec<Lesson>,
}

impl Ledger {
    /// Finds a client by id.
    pub fn client(&self, id: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    /// Finds a course by id.
    pub fn course(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    /// Courses owned by a client, in store order.
    pub fn courses_of<'a>(&'a self, client_id: &'a str) -> impl Iterator<Item = &'a Course> + 'a {
        self.courses.iter().filter(move |c| c.client_id == client_id)
    }

    /// Lessons owned by a course, in store order.
    pub fn lessons_of<'a>(&'a self, course_id: &'a str) -> impl Iterator<Item = &'a Lesson> + 'a {
        self.lessons.iter().filter(move |l| l.course_id == course_id)
    }
}

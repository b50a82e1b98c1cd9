//! HTTP routes.
//!
//! ```text
//! /                                   welcome message
//! /health                             service + database health
//!
//! /clients                            list, create
//! /clients/report/all                 report for every client
//! /clients/{id}                       get, rename, delete (cascade)
//! /clients/{id}/types                 merged price catalog
//! /clients/{id}/types/{type_id}       set (PUT) / clear (DELETE) override
//! /clients/{id}/report                client report
//! /clients/{id}/courses               per-course summary
//!
//! /courses                            list (with valued lessons), create
//! /courses/report/all                 report for every course
//! /courses/{id}                       get, rename, delete (cascade)
//! /courses/{id}/lessons               valued lessons
//! /courses/{id}/report                course report
//!
//! /lessons                            list (valued), create
//! /lessons/{id}                       get, update, delete
//!
//! /types                              list, create
//! /types/{id}                         get, update, delete
//! ```

pub mod clients;
pub mod courses;
pub mod health;
pub mod lessons;
pub mod types;

use serde::{Deserialize, Serialize};

/// Body of delete and other acknowledgement responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}

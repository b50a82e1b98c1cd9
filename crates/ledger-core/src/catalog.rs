//! # Catalog Module
//!
//! Merges the base price list with one client's overrides.
//!
//! ```text
//! lesson_types          client overrides          merged catalog
//! ────────────          ────────────────          ─────────────────────────────────
//! Hour   50      +      Hour → 40          =      Hour   base 50  client 40  eff 40
//! Exam   25                                       Exam   base 25  client –   eff 25
//! Book   10                                       Book   base 10  client –   eff 10
//! ```
//!
//! One entry per lesson type, in store order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::ledger::Ledger;
use crate::pricing::PriceBook;
use crate::types::UnitType;

/// A lesson type as priced for a specific client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogEntry {
    pub lesson_type_id: String,
    pub name: String,
    pub unit_type: UnitType,
    #[ts(type = "number")]
    pub base_value: Decimal,
    /// The client's override, `null` when the client pays the base value.
    #[ts(type = "number | null")]
    pub client_value: Option<Decimal>,
    #[ts(type = "number")]
    pub effective_value: Decimal,
}

/// Every lesson type with the client's override merged in.
///
/// ## Errors
/// `CoreError::NotFound` when the client is not in the snapshot.
pub fn merged_catalog(ledger: &Ledger, client_id: &str) -> CoreResult<Vec<CatalogEntry>> {
    if ledger.client(client_id).is_none() {
        return Err(CoreError::not_found("Client", client_id));
    }
    let book = PriceBook::from_ledger(ledger);

    Ok(ledger
        .lesson_types
        .iter()
        .map(|lesson_type| {
            let client_value = book.client_price(client_id, &lesson_type.id);
            CatalogEntry {
                lesson_type_id: lesson_type.id.clone(),
                name: lesson_type.name.clone(),
                unit_type: lesson_type.unit_type,
                base_value: lesson_type.base_value,
                client_value,
                effective_value: client_value.unwrap_or(lesson_type.base_value),
            }
        })
        .collect())
}

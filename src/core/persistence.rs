//! Application document encoding.
//!
//! The whole state is one JSON object with exactly five arrays: `students`,
//! `courses`, `facs`, `payments` and `expenses`. It is written in full after
//! every change. There is no schema version.
//!
//! Loading never fails on bad content. If the stored text does not parse as a
//! whole, it is discarded and every collection starts empty; there is no
//! partial recovery.

use crate::{
    core::storage::LocalStorage,
    errors::Result,
    models::{Course, Expense, Fac, Payment, Student},
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// The five persisted collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppData {
    /// Students with their embedded installments
    #[serde(default)]
    pub students: Vec<Student>,
    /// Courses
    #[serde(default)]
    pub courses: Vec<Course>,
    /// Cohorts
    #[serde(default)]
    pub facs: Vec<Fac>,
    /// Top-level payments
    #[serde(default)]
    pub payments: Vec<Payment>,
    /// Expenses
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

impl AppData {
    /// True when every collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
            && self.courses.is_empty()
            && self.facs.is_empty()
            && self.payments.is_empty()
            && self.expenses.is_empty()
    }
}

/// Serializes the document.
pub fn encode(data: &AppData) -> Result<String> {
    Ok(serde_json::to_string(data)?)
}

/// Parses a stored document, discarding it entirely if any part is malformed.
#[must_use]
pub fn decode(raw: &str) -> AppData {
    match serde_json::from_str(raw) {
        Ok(data) => data,
        Err(e) => {
            warn!("Failed to parse stored application data, starting empty: {e}");
            AppData::default()
        }
    }
}

/// Reads the document stored under `key`.
///
/// A missing key and a corrupt value both produce empty collections. Only a
/// failure of the storage itself is returned as an error.
#[instrument(skip(storage))]
pub async fn load(storage: &LocalStorage, key: &str) -> Result<AppData> {
    let data = match storage.get_item(key).await? {
        Some(raw) => decode(&raw),
        None => {
            info!("No stored application data, starting empty");
            AppData::default()
        }
    };
    info!(
        students = data.students.len(),
        courses = data.courses.len(),
        facs = data.facs.len(),
        payments = data.payments.len(),
        expenses = data.expenses.len(),
        "Loaded application data"
    );
    Ok(data)
}

/// Writes the whole document under `key`.
pub async fn save(storage: &LocalStorage, key: &str, data: &AppData) -> Result<()> {
    let raw = encode(data)?;
    storage.set_item(key, &raw).await
}

//! Top-level payment records.
//!
//! These live alongside the installments embedded in each student. No view
//! derives anything from them; they are stored and round-tripped as-is.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::PaymentStatus;

/// A payment recorded outside a student's installment schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Unique identifier
    pub id: String,
    /// Paying student; a reference, not ownership
    pub student_id: String,
    /// Amount
    pub amount: f64,
    /// Due date
    pub due_date: NaiveDate,
    /// Current status
    pub status: PaymentStatus,
    /// When it was paid, if it was
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,
    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

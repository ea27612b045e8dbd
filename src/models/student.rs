//! Student and embedded payment installment records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Enrollment state of a student.
///
/// Only two values carry meaning for the views; anything else typed into the
/// form is preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EnrollmentStatus {
    /// `"Matriculado"`
    Enrolled,
    /// `"Cancelado"`
    Canceled,
    /// Any other free-form label
    Other(String),
}

impl EnrollmentStatus {
    /// Label as shown and stored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Enrolled => "Matriculado",
            Self::Canceled => "Cancelado",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for EnrollmentStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Matriculado" => Self::Enrolled,
            "Cancelado" => Self::Canceled,
            _ => Self::Other(value),
        }
    }
}

impl From<EnrollmentStatus> for String {
    fn from(value: EnrollmentStatus) -> Self {
        match value {
            EnrollmentStatus::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

/// Status of a single installment. Any status may be set from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    /// Not paid yet
    Pending,
    /// Paid
    Paid,
    /// Marked overdue by hand
    Overdue,
    /// Voided
    Canceled,
}

impl PaymentStatus {
    /// Stored label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
            Self::Overdue => "OVERDUE",
            Self::Canceled => "CANCELED",
        }
    }
}

/// One tuition installment, owned by exactly one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInstallment {
    /// Unique identifier
    pub id: String,
    /// Owning student
    pub student_id: String,
    /// 1-based position in the schedule
    pub installment_number: u32,
    /// Due date
    pub due_date: NaiveDate,
    /// Amount due
    pub amount: f64,
    /// Current status
    pub status: PaymentStatus,
    /// When it was paid, if it was
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,
    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A student enrolled in a cohort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Unique identifier
    pub id: String,
    /// Full name
    pub full_name: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    #[serde(default)]
    pub phone: String,
    /// Cohort code; a reference, not ownership, and never checked
    pub fac_code: String,
    /// Total tuition budgeted for this student
    pub course_fee: f64,
    /// Enrollment state, absent when never set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrollment_status: Option<EnrollmentStatus>,
    /// Ordered installment schedule
    #[serde(default)]
    pub payment_installments: Vec<PaymentInstallment>,
}

//! Course templates that cohorts are opened from.

use serde::{Deserialize, Serialize};

/// A course offering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Short code used in cohort codes (e.g., `"C1"`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Suggested tuition for a new student
    #[serde(default)]
    pub default_fee: f64,
    /// Suggested number of installments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installment_count: Option<u32>,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

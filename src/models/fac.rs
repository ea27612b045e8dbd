//! Class cohorts ("FACs").

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifecycle label of a cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FacStatus {
    /// Not started yet
    #[serde(rename = "Planejada")]
    Planned,
    /// Running
    #[serde(rename = "Em andamento")]
    InProgress,
    /// Finished
    #[serde(rename = "Finalizada")]
    Finished,
    /// Called off
    #[serde(rename = "Cancelada")]
    Canceled,
}

impl FacStatus {
    /// Stored label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "Planejada",
            Self::InProgress => "Em andamento",
            Self::Finished => "Finalizada",
            Self::Canceled => "Cancelada",
        }
    }
}

/// A cohort of one course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fac {
    /// Unique identifier; older documents may carry only the code
    #[serde(default)]
    pub id: String,
    /// Human-assigned cohort code (e.g., `"FAC_C1_T18"`), unique by convention
    pub code: String,
    /// Course this cohort runs; a reference, not ownership
    pub course_id: String,
    /// Display name
    pub name: String,
    /// First day of class
    pub start_date: NaiveDate,
    /// Lifecycle label
    pub status: FacStatus,
    /// Free-form description
    #[serde(default)]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fac_status_labels_round_trip() -> serde_json::Result<()> {
        assert_eq!(
            serde_json::to_string(&FacStatus::InProgress)?,
            "\"Em andamento\""
        );
        let parsed: FacStatus = serde_json::from_str("\"Cancelada\"")?;
        assert_eq!(parsed, FacStatus::Canceled);
        assert_eq!(parsed.as_str(), "Cancelada");
        Ok(())
    }
}

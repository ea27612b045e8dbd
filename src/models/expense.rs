//! Operating expenses charged to a cohort.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The fixed set of expense categories.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ExpenseCategory {
    /// Paid social advertising
    #[serde(rename = "Facebook Ads")]
    FacebookAds,
    /// Course platform credits
    #[serde(rename = "Platform Credits")]
    PlatformCredits,
    /// Bank slip issuing fees
    #[serde(rename = "Boletos Fees")]
    BoletosFees,
    /// Card processor fees
    #[serde(rename = "Credit Card Fees")]
    CreditCardFees,
    /// Traffic manager fees
    #[serde(rename = "Traffic Manager")]
    TrafficManager,
    /// Anything else
    #[default]
    Other,
}

impl ExpenseCategory {
    /// Stored label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FacebookAds => "Facebook Ads",
            Self::PlatformCredits => "Platform Credits",
            Self::BoletosFees => "Boletos Fees",
            Self::CreditCardFees => "Credit Card Fees",
            Self::TrafficManager => "Traffic Manager",
            Self::Other => "Other",
        }
    }
}

/// One expense line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Unique identifier; the expense form of the web front end stores none
    #[serde(default)]
    pub id: String,
    /// Cohort charged; a reference, not ownership
    pub fac_code: String,
    /// What it was for
    pub description: String,
    /// Amount spent
    pub amount: f64,
    /// When it was incurred
    pub date: NaiveDate,
    /// Category
    pub category: ExpenseCategory,
}

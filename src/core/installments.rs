//! Installment listing and schedule generation.

use crate::{
    core::record::new_id,
    models::{PaymentInstallment, PaymentStatus, Student},
};
use chrono::{Months, NaiveDate};

/// Criteria for the payments listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallmentFilter {
    /// Case-insensitive substring matched against name OR email; empty matches all
    pub search_term: String,
    /// Exact cohort code; `None` or empty matches all
    pub fac_code: Option<String>,
}

impl InstallmentFilter {
    /// Filter with only a search term.
    #[must_use]
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search_term: term.into(),
            fac_code: None,
        }
    }

    /// Restricts the filter to one cohort.
    #[must_use]
    pub fn in_fac(mut self, fac_code: impl Into<String>) -> Self {
        self.fac_code = Some(fac_code.into());
        self
    }

    /// Whether `student` passes both criteria.
    #[must_use]
    pub fn matches(&self, student: &Student) -> bool {
        let fac_matches = match self.fac_code.as_deref() {
            None | Some("") => true,
            Some(code) => student.fac_code == code,
        };
        if !fac_matches {
            return false;
        }

        let term = self.search_term.to_lowercase();
        student.full_name.to_lowercase().contains(&term)
            || student.email.to_lowercase().contains(&term)
    }
}

/// An installment annotated with its owner, as the payments listing shows it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstallmentRow<'a> {
    /// The installment itself
    pub installment: &'a PaymentInstallment,
    /// Owner's full name
    pub student_name: &'a str,
    /// Owner's email
    pub student_email: &'a str,
    /// Owner's cohort code
    pub fac_code: &'a str,
}

/// Flattens the installments of every matching student, sorted by due date.
///
/// The sort is stable: installments due the same day keep their collection
/// order.
#[must_use]
pub fn filter_installments<'a>(
    students: &'a [Student],
    filter: &InstallmentFilter,
) -> Vec<InstallmentRow<'a>> {
    let mut rows: Vec<InstallmentRow<'a>> = students
        .iter()
        .filter(|s| filter.matches(s))
        .flat_map(|student| {
            student
                .payment_installments
                .iter()
                .map(move |installment| InstallmentRow {
                    installment,
                    student_name: &student.full_name,
                    student_email: &student.email,
                    fac_code: &student.fac_code,
                })
        })
        .collect();

    rows.sort_by_key(|row| row.installment.due_date);
    rows
}

/// Splits `total` into `count` monthly PENDING installments starting at
/// `first_due`.
///
/// Each amount is rounded down to cents and the last one absorbs the
/// remainder, so the amounts add back up to `total` and none is below the
/// regular amount. A `count` of zero yields no installments.
#[must_use]
pub fn build_installment_schedule(
    student_id: &str,
    total: f64,
    count: u32,
    first_due: NaiveDate,
) -> Vec<PaymentInstallment> {
    if count == 0 {
        return Vec::new();
    }

    // Cast safety: fees are far below 2^52 cents.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    let (regular, last) = {
        let total_cents = (total * 100.0).round() as i64;
        let regular_cents = total_cents.div_euclid(i64::from(count));
        let last_cents = total_cents - regular_cents * i64::from(count - 1);
        (regular_cents as f64 / 100.0, last_cents as f64 / 100.0)
    };

    (0..count)
        .map(|i| PaymentInstallment {
            id: new_id(),
            student_id: student_id.to_string(),
            installment_number: i + 1,
            due_date: first_due
                .checked_add_months(Months::new(i))
                .unwrap_or(NaiveDate::MAX),
            amount: if i + 1 == count { last } else { regular },
            status: PaymentStatus::Pending,
            payment_date: None,
            notes: None,
        })
        .collect()
}

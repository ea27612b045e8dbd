//! Form-boundary validation.
//!
//! These are the only checks in the system. The store accepts whatever it is
//! given; a form that fails here never reaches it, and state is unchanged.

use crate::{
    errors::{Error, Result},
    models::{EnrollmentStatus, ExpenseCategory, FacStatus},
};
use chrono::NaiveDate;

fn require(value: &str, field: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::MissingField { field });
    }
    Ok(())
}

/// Input for enrolling a new student.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentForm {
    /// Full name (required)
    pub full_name: String,
    /// Email (required)
    pub email: String,
    /// Phone
    pub phone: String,
    /// Cohort code (required)
    pub fac_code: String,
    /// Tuition; when absent, the cohort's course default fee is used
    pub course_fee: Option<f64>,
    /// Installments to generate; when absent, the course's count or the
    /// configured default is used
    pub installment_count: Option<u32>,
    /// Due date of the first installment
    pub first_due_date: NaiveDate,
    /// Enrollment state
    pub enrollment_status: Option<EnrollmentStatus>,
}

impl StudentForm {
    /// Presence checks.
    ///
    /// # Errors
    /// `MissingField` for a blank name, email or cohort, `InvalidAmount` for a
    /// negative or non-finite fee.
    pub fn validate(&self) -> Result<()> {
        require(&self.full_name, "fullName")?;
        require(&self.email, "email")?;
        require(&self.fac_code, "facCode")?;
        if let Some(fee) = self.course_fee {
            if !fee.is_finite() || fee < 0.0 {
                return Err(Error::InvalidAmount { amount: fee });
            }
        }
        Ok(())
    }
}

/// Input for creating or editing a cohort.
#[derive(Debug, Clone, PartialEq)]
pub struct FacForm {
    /// Course the cohort runs (required)
    pub course_id: String,
    /// Display name (required)
    pub name: String,
    /// First day of class
    pub start_date: NaiveDate,
    /// Lifecycle label
    pub status: FacStatus,
    /// Free-form description
    pub description: String,
    /// Code suffix (e.g., `"18"` for `FAC_C1_T18`); required for new cohorts
    pub code_suffix: String,
}

impl FacForm {
    /// Presence checks for a new cohort.
    ///
    /// # Errors
    /// `MissingField` for a blank course, name or code suffix.
    pub fn validate_new(&self) -> Result<()> {
        self.validate_edit()?;
        require(&self.code_suffix, "codeSuffix")
    }

    /// Presence checks for an edit; the code is fixed once assigned.
    ///
    /// # Errors
    /// `MissingField` for a blank course or name.
    pub fn validate_edit(&self) -> Result<()> {
        require(&self.course_id, "courseId")?;
        require(&self.name, "name")
    }
}

/// Input for recording an expense against a cohort.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseForm {
    /// Cohort charged
    pub fac_code: String,
    /// What it was for (required)
    pub description: String,
    /// Amount; must be positive
    pub amount: f64,
    /// When it was incurred
    pub date: NaiveDate,
    /// Category
    pub category: ExpenseCategory,
}

impl ExpenseForm {
    /// Presence checks.
    ///
    /// # Errors
    /// `MissingField` for a blank description or cohort, `InvalidAmount`
    /// unless the amount is a positive number.
    pub fn validate(&self) -> Result<()> {
        require(&self.fac_code, "facCode")?;
        require(&self.description, "description")?;
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::InvalidAmount {
                amount: self.amount,
            });
        }
        Ok(())
    }
}

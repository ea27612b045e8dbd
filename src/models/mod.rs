//! Domain records stored in the application document.
//!
//! Field names serialize in camelCase so a document written by the web front
//! end loads unchanged.

pub mod course;
pub mod expense;
pub mod fac;
pub mod payment;
pub mod student;

pub use course::Course;
pub use expense::{Expense, ExpenseCategory};
pub use fac::{Fac, FacStatus};
pub use payment::Payment;
pub use student::{EnrollmentStatus, PaymentInstallment, PaymentStatus, Student};

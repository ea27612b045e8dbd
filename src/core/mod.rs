//! Core business logic, independent of how the data is presented.

/// State container: the single owner and writer of application state
pub mod context;
/// JSON and CSV exports of the document
pub mod export;
/// Form-boundary presence checks
pub mod forms;
/// Console rendering of views
pub mod format;
/// Payments listing and installment schedules
pub mod installments;
/// Whole-document JSON encoding and recovery
pub mod persistence;
/// Bank statement matching against open installments
pub mod reconciliation;
/// Generic add/update/delete over the five collections
pub mod record;
/// Durable key/value storage
pub mod storage;
/// Per-cohort financial summaries and dashboard ratios
pub mod summary;

//! Unified error types for the admin store.
//!
//! A malformed stored document is not an error here: it is logged and recovered
//! to empty collections by [`crate::core::persistence`].

use thiserror::Error;

/// Every failure the crate can report.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
    },

    /// The backing `SQLite` store failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// JSON encoding failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV export or bank statement parsing failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required form field was left blank
    #[error("Required field is missing: {field}")]
    MissingField {
        /// Name of the blank field
        field: &'static str,
    },

    /// A monetary amount was rejected at the form boundary
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// A bank statement lacks a required column
    #[error("Invalid bank statement: {message}")]
    BankStatement {
        /// What is missing
        message: String,
    },

    /// A referenced course does not exist
    #[error("Course not found: {id}")]
    CourseNotFound {
        /// Id that was looked up
        id: String,
    },
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

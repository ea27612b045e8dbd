//! Application settings loaded from `config.toml`.
//!
//! Every section and field is optional. A missing file yields the defaults, so
//! a fresh checkout runs without any configuration.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Local storage key the web front end uses for its document.
pub const DEFAULT_STORAGE_KEY: &str = "metaforma_app_data";

/// Number added to the cohort count to suggest the next code suffix.
pub const DEFAULT_CODE_SUFFIX_OFFSET: usize = 18;

/// Installments generated for a new student when nothing else is known.
pub const DEFAULT_INSTALLMENT_COUNT: u32 = 12;

/// Largest gap, in reais, between a bank credit and an installment that still
/// scores on amount.
pub const DEFAULT_AMOUNT_TOLERANCE: f64 = 5.0;

/// Largest gap, in days, between a bank credit and a due date that still
/// scores on date.
pub const DEFAULT_DATE_TOLERANCE_DAYS: i64 = 3;

/// Score a credit must exceed to be matched to an installment.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.6;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where and under which key the document is stored
    pub storage: StorageSettings,
    /// Cohort code generation
    pub facs: FacSettings,
    /// Installment schedule generation
    pub installments: InstallmentSettings,
    /// Bank statement matching
    pub reconciliation: ReconciliationSettings,
}

/// `[storage]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// `SeaORM` connection URL; `DATABASE_URL` overrides it
    pub database_url: Option<String>,
    /// Key holding the application document
    pub key: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_url: None,
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

/// `[facs]` section
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct FacSettings {
    /// Added to the current cohort count to suggest a new code suffix
    pub code_suffix_offset: usize,
}

impl Default for FacSettings {
    fn default() -> Self {
        Self {
            code_suffix_offset: DEFAULT_CODE_SUFFIX_OFFSET,
        }
    }
}

/// `[installments]` section
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct InstallmentSettings {
    /// Installments per student when the course does not say
    pub default_count: u32,
}

impl Default for InstallmentSettings {
    fn default() -> Self {
        Self {
            default_count: DEFAULT_INSTALLMENT_COUNT,
        }
    }
}

/// `[reconciliation]` section
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReconciliationSettings {
    /// See [`DEFAULT_AMOUNT_TOLERANCE`]
    pub amount_tolerance: f64,
    /// See [`DEFAULT_DATE_TOLERANCE_DAYS`]
    pub date_tolerance_days: i64,
    /// See [`DEFAULT_MATCH_THRESHOLD`]
    pub match_threshold: f64,
}

impl Default for ReconciliationSettings {
    fn default() -> Self {
        Self {
            amount_tolerance: DEFAULT_AMOUNT_TOLERANCE,
            date_tolerance_days: DEFAULT_DATE_TOLERANCE_DAYS,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }
}

/// Parses settings from TOML text.
///
/// # Errors
/// Returns an error if the TOML syntax is invalid or a field has the wrong type.
pub fn parse_settings(contents: &str) -> Result<Settings> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads settings from a TOML file, falling back to defaults when it is absent.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);

    if !path_ref.exists() {
        info!("No configuration at {:?}, using defaults", path_ref);
        return Ok(Settings::default());
    }

    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;
    parse_settings(&contents)
}

/// Loads settings from the default location (./config.toml)
pub fn load_default_settings() -> Result<Settings> {
    load_settings("config.toml")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_parse_full_settings() -> Result<()> {
        let toml_str = r#"
            [storage]
            database_url = "sqlite::memory:"
            key = "other_key"

            [facs]
            code_suffix_offset = 3

            [installments]
            default_count = 6

            [reconciliation]
            amount_tolerance = 1.5
            date_tolerance_days = 5
        "#;

        let settings = parse_settings(toml_str)?;
        assert_eq!(settings.storage.database_url.as_deref(), Some("sqlite::memory:"));
        assert_eq!(settings.storage.key, "other_key");
        assert_eq!(settings.facs.code_suffix_offset, 3);
        assert_eq!(settings.installments.default_count, 6);
        assert_eq!(settings.reconciliation.amount_tolerance, 1.5);
        assert_eq!(settings.reconciliation.date_tolerance_days, 5);
        assert_eq!(settings.reconciliation.match_threshold, DEFAULT_MATCH_THRESHOLD);
        Ok(())
    }

    #[test]
    fn test_empty_settings_use_defaults() -> Result<()> {
        let settings = parse_settings("")?;
        assert!(settings.storage.database_url.is_none());
        assert_eq!(settings.storage.key, DEFAULT_STORAGE_KEY);
        assert_eq!(settings.facs.code_suffix_offset, DEFAULT_CODE_SUFFIX_OFFSET);
        assert_eq!(settings.installments.default_count, DEFAULT_INSTALLMENT_COUNT);
        assert_eq!(settings.reconciliation, ReconciliationSettings::default());
        Ok(())
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() -> Result<()> {
        let settings = parse_settings("[storage]\ndatabase_url = \"sqlite::memory:\"\n")?;
        assert_eq!(settings.storage.key, DEFAULT_STORAGE_KEY);
        Ok(())
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = parse_settings("[facs]\ncode_suffix_offset = \"many\"\n");
        assert!(matches!(result, Err(Error::Config { message: _ })));
    }

    #[test]
    fn test_missing_file_yields_defaults() -> Result<()> {
        let settings = load_settings("definitely/not/here/config.toml")?;
        assert_eq!(settings.storage.key, DEFAULT_STORAGE_KEY);
        Ok(())
    }
}

/// Database connection and table management
pub mod database;

/// Settings loading from config.toml
pub mod settings;

pub use settings::Settings;

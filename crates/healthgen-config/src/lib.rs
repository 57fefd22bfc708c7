//! Healthgen settings
//!
//! Loads generator settings from an optional YAML, TOML or JSON file overlaid
//! with `HEALTHGEN_` environment variables, validates them and writes them
//! back out.

pub mod error;
pub mod manager;
pub mod types;

pub use error::{ConfigError, Result};
pub use manager::ConfigManager;
pub use types::{
    GeneratorSettings, MigrationSettings, OutputSettings, ProjectSettings, SettingsManager,
    TIERS,
};

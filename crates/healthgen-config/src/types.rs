//! Settings types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tier names accepted in settings, lowest first
pub const TIERS: [&str; 4] = ["basic", "intermediate", "advanced", "enterprise"];

/// Top-level generator settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratorSettings {
    /// Tier to generate
    #[serde(default = "default_tier")]
    pub tier: String,
    /// Project identity
    #[serde(default)]
    pub project: ProjectSettings,
    /// Where and how to write output
    #[serde(default)]
    pub output: OutputSettings,
    /// Optional tier migration request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migration: Option<MigrationSettings>,
}

/// Project identity settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ProjectSettings {
    /// Project name
    #[serde(default)]
    pub name: String,
    /// Go module path
    #[serde(default)]
    pub module: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputSettings {
    /// Output root directory
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
    /// Render and report without writing
    #[serde(default)]
    pub dry_run: bool,
}

/// Migration request settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MigrationSettings {
    /// Root of the project to upgrade
    pub project_root: PathBuf,
    /// Tier the project is on
    pub from_tier: String,
    /// Tier to upgrade to
    pub to_tier: String,
}

fn default_tier() -> String {
    TIERS[0].to_string()
}

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            tier: default_tier(),
            project: ProjectSettings::default(),
            output: OutputSettings::default(),
            migration: None,
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            dry_run: false,
        }
    }
}

/// Loads, saves and validates generator settings
pub trait SettingsManager {
    /// Load settings from every configured source
    fn load_settings(&self) -> Result<GeneratorSettings, ConfigError>;
    /// Persist settings
    fn save_settings(&self, settings: &GeneratorSettings) -> Result<(), ConfigError>;
    /// Validate settings
    fn validate_settings(&self, settings: &GeneratorSettings) -> Result<(), ConfigError>;
}

//! Settings manager implementation

use std::{collections::HashMap, fs, path::PathBuf};

use config::{Config, Environment, File};
use tracing::debug;

use crate::{
    error::{ConfigError, Result},
    types::{GeneratorSettings, SettingsManager, TIERS},
};

/// Prefix of environment overrides, e.g. `HEALTHGEN_PROJECT__NAME`
pub const ENV_PREFIX: &str = "HEALTHGEN";

/// Layered settings manager: settings file, then environment
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// Settings file path
    config_path: PathBuf,
    /// Environment prefix
    env_prefix: String,
    /// Fail with `NotFound` when the settings file is absent
    required: bool,
    /// Explicit environment, replacing the process environment
    env_override: Option<HashMap<String, String>>,
}

impl ConfigManager {
    /// Manager over the default settings path
    pub fn new() -> Self {
        Self::with_path(Self::default_config_path())
    }

    /// Manager over a custom settings path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            env_prefix: ENV_PREFIX.to_string(),
            required: false,
            env_override: None,
        }
    }

    /// Require the settings file to exist
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Read overrides from `vars` instead of the process environment
    pub fn with_env(mut self, vars: HashMap<String, String>) -> Self {
        self.env_override = Some(vars);
        self
    }

    /// Settings file path
    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Default settings path under the user config directory
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("healthgen")
            .join("healthgen.yaml")
    }

    fn environment(&self) -> Environment {
        let environment = Environment::with_prefix(&self.env_prefix)
            .prefix_separator("_")
            .separator("__");
        match &self.env_override {
            Some(vars) => environment.source(Some(vars.clone().into_iter().collect())),
            None => environment,
        }
    }

    fn extension(&self) -> String {
        self.config_path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default()
    }
}

impl SettingsManager for ConfigManager {
    fn load_settings(&self) -> Result<GeneratorSettings> {
        let exists = self.config_path.is_file();
        if self.required && !exists {
            return Err(ConfigError::NotFound(self.config_path.display().to_string()));
        }
        debug!(path = %self.config_path.display(), exists, "Loading settings");

        let config = Config::builder()
            .add_source(File::from(self.config_path.as_path()).required(false))
            .add_source(self.environment())
            .build()?;

        Ok(config.try_deserialize()?)
    }

    fn save_settings(&self, settings: &GeneratorSettings) -> Result<()> {
        let contents = match self.extension().as_str() {
            "yaml" | "yml" => {
                serde_yaml::to_string(settings).map_err(|e| ConfigError::Parse(e.to_string()))?
            }
            "toml" => toml::to_string(settings).map_err(|e| ConfigError::Parse(e.to_string()))?,
            "json" => serde_json::to_string_pretty(settings)
                .map_err(|e| ConfigError::Parse(e.to_string()))?,
            other => {
                return Err(ConfigError::Validation(format!(
                    "Unsupported settings format '{other}' (expected yaml, toml or json)"
                )))
            }
        };

        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.config_path, contents)?;
        debug!(path = %self.config_path.display(), "Saved settings");
        Ok(())
    }

    fn validate_settings(&self, settings: &GeneratorSettings) -> Result<()> {
        if settings.project.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Project name must not be empty".to_string(),
            ));
        }
        if settings.project.module.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Module path must not be empty".to_string(),
            ));
        }
        check_tier("tier", &settings.tier)?;
        if let Some(migration) = &settings.migration {
            check_tier("migration.from_tier", &migration.from_tier)?;
            check_tier("migration.to_tier", &migration.to_tier)?;
        }
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

fn check_tier(field: &str, value: &str) -> Result<()> {
    let value = value.trim();
    if TIERS.iter().any(|tier| tier.eq_ignore_ascii_case(value)) {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "{field} must be one of {} (got '{value}')",
            TIERS.join(", ")
        )))
    }
}

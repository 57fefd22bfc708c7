//! Variable context for one generation run
//!
//! The context is validated and built before any file is touched, and is
//! read-only afterwards. It captures the generation timestamp once so every
//! file of a run carries the same value.

use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use healthgen_config::GeneratorSettings;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Map, Value};

use crate::{
    error::{GenerationError, Result},
    features::{FeatureCatalog, FeatureSet},
    tier::Tier,
};

/// Version stamped into generated projects unless overridden
pub const DEFAULT_VERSION: &str = "1.0.0";

static PROJECT_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9-]*$").expect("valid project name pattern"));
static MODULE_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._~-]+$").expect("valid module segment pattern"));

/// Caller-supplied generation inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Project name, e.g. `svc-a`
    pub project_name: String,
    /// Go module path, e.g. `example.com/svc-a`
    pub module_uri: String,
    /// Description; defaults to `"<name> health endpoint service"`
    pub description: Option<String>,
    /// Version; defaults to [`DEFAULT_VERSION`]
    pub version: Option<String>,
    /// Selected tier
    pub tier: Tier,
}

impl GenerationConfig {
    /// Config with default description and version
    pub fn new(project_name: impl Into<String>, module_uri: impl Into<String>, tier: Tier) -> Self {
        Self {
            project_name: project_name.into(),
            module_uri: module_uri.into(),
            description: None,
            version: None,
            tier,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Convert loaded settings, parsing the tier name
    pub fn from_settings(settings: &GeneratorSettings) -> Result<Self> {
        Ok(Self {
            project_name: settings.project.name.clone(),
            module_uri: settings.project.module.clone(),
            description: settings.project.description.clone(),
            version: settings.project.version.clone(),
            tier: settings.tier.parse()?,
        })
    }
}

/// Resolved substitution namespace for one run
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationContext {
    project_name: String,
    module_uri: String,
    description: String,
    version: String,
    generated_at: DateTime<Utc>,
    tier: Tier,
    features: FeatureSet,
}

impl GenerationContext {
    /// Project name
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Module URI
    pub fn module_uri(&self) -> &str {
        &self.module_uri
    }

    /// Description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Version
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Generation timestamp
    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// Tier the context was built for
    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Features of that tier
    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    /// The namespace templates are rendered against
    pub fn namespace(&self) -> Value {
        let features: Map<String, Value> = self
            .features
            .iter()
            .map(|(feature, enabled)| (feature.to_string(), Value::Bool(enabled)))
            .collect();

        json!({
            "Config": {
                "Name": self.project_name,
                "GoModule": self.module_uri,
                "Description": self.description,
                "Version": self.version,
                "Tier": self.tier.as_str(),
            },
            "Timestamp": self.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            "Features": features,
        })
    }
}

/// Validates configuration and assembles contexts
#[derive(Debug, Clone, Default)]
pub struct ContextBuilder {
    catalog: FeatureCatalog,
}

impl ContextBuilder {
    /// Builder over the standard feature catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder over a custom catalog
    pub fn with_catalog(catalog: FeatureCatalog) -> Self {
        Self { catalog }
    }

    /// Build a context stamped with the current time
    pub fn build(&self, config: &GenerationConfig) -> Result<GenerationContext> {
        self.build_at(config, Utc::now())
    }

    /// Build a context stamped with a fixed time
    pub fn build_at(
        &self,
        config: &GenerationConfig,
        generated_at: DateTime<Utc>,
    ) -> Result<GenerationContext> {
        validate_project_name(&config.project_name)?;
        validate_module_uri(&config.module_uri)?;

        let description = config
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} health endpoint service", config.project_name));
        let version = config
            .version
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_VERSION)
            .to_string();

        Ok(GenerationContext {
            project_name: config.project_name.clone(),
            module_uri: config.module_uri.clone(),
            description,
            version,
            generated_at: generated_at.with_nanosecond(0).unwrap_or(generated_at),
            tier: config.tier,
            features: self.catalog.features_for_tier(config.tier),
        })
    }
}

/// Check a project name: ASCII letters, digits and hyphens, not starting
/// with a hyphen
pub fn validate_project_name(name: &str) -> Result<()> {
    if PROJECT_NAME.is_match(name) {
        Ok(())
    } else {
        Err(GenerationError::InvalidProjectName(name.to_string()))
    }
}

/// Check a module URI such as `github.com/org/svc`
pub fn validate_module_uri(uri: &str) -> Result<()> {
    let invalid = |reason: &str| GenerationError::InvalidModuleUri {
        uri: uri.to_string(),
        reason: reason.to_string(),
    };

    if uri.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if uri.starts_with('/') || uri.ends_with('/') {
        return Err(invalid("must not start or end with '/'"));
    }
    for segment in uri.split('/') {
        if segment == "." || segment == ".." {
            return Err(invalid("must not contain '.' or '..' segments"));
        }
        if !MODULE_SEGMENT.is_match(segment) {
            return Err(invalid("segments may only contain letters, digits and . _ ~ -"));
        }
    }
    Ok(())
}

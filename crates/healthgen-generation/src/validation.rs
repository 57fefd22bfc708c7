//! Check that a project tree holds every file its tier produces

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{
    classifier::FileClassifier,
    error::{GenerationError, Result},
    features::FeatureCatalog,
    registry::TemplateRegistry,
    tier::Tier,
};

/// Result of validating a project against a tier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectValidation {
    /// Tier validated against
    pub tier: Tier,
    /// Expected files found under the root
    pub present: Vec<PathBuf>,
    /// Expected files not found
    pub missing: Vec<PathBuf>,
}

impl ProjectValidation {
    /// Whether every expected file is present
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Validates project trees against the template set of a tier
#[derive(Debug, Clone)]
pub struct ProjectValidator {
    registry: TemplateRegistry,
    catalog: FeatureCatalog,
    classifier: FileClassifier,
}

impl ProjectValidator {
    /// Validator over the built-in templates and standard catalog
    pub fn new() -> Result<Self> {
        Ok(Self::with_parts(
            TemplateRegistry::builtin()?,
            FeatureCatalog::standard(),
        ))
    }

    /// Validator over a custom registry and catalog
    pub fn with_parts(registry: TemplateRegistry, catalog: FeatureCatalog) -> Self {
        Self {
            registry,
            catalog,
            classifier: FileClassifier::new(),
        }
    }

    /// Check `root` against `tier`
    pub fn validate(&self, root: &Path, tier: Tier) -> Result<ProjectValidation> {
        if !root.is_dir() {
            return Err(GenerationError::ProjectNotFound(root.to_path_buf()));
        }

        let features = self.catalog.features_for_tier(tier);
        let (present, missing) = self
            .registry
            .resolve_for_feature_set(&features)
            .into_iter()
            .map(|descriptor| self.classifier.output_path(descriptor.relative_output_path()))
            .partition::<Vec<_>, _>(|path| root.join(path).is_file());

        debug!(
            tier = %tier,
            present = present.len(),
            missing = missing.len(),
            "Validated project"
        );
        Ok(ProjectValidation {
            tier,
            present,
            missing,
        })
    }

    /// Check `root` against a tier given by name
    pub fn validate_named(&self, root: &Path, tier: &str) -> Result<ProjectValidation> {
        self.validate(root, tier.parse()?)
    }
}

/// Check `root` against `tier` using the built-in templates
pub fn validate_project(root: &Path, tier: Tier) -> Result<ProjectValidation> {
    ProjectValidator::new()?.validate(root, tier)
}

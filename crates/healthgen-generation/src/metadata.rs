//! Template-set metadata (`template.yaml`)

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{GenerationError, Result},
    features::FeatureCatalog,
    tier::Tier,
};

/// File name of the metadata sidecar
pub const METADATA_FILE: &str = "template.yaml";

/// Describes the template set of one tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSetMetadata {
    /// Template set name, e.g. `health-endpoint-advanced`
    pub name: String,
    /// Tier the set targets
    pub tier: Tier,
    /// Human-readable summary
    pub description: String,
    /// Version of the template set
    pub version: String,
    /// Features enabled by the set, in catalog order
    pub features: Vec<String>,
}

impl TemplateSetMetadata {
    /// Metadata of a tier's template set
    pub fn for_tier(catalog: &FeatureCatalog, tier: Tier) -> Self {
        Self {
            name: format!("health-endpoint-{tier}"),
            tier,
            description: catalog.description(tier).to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            features: catalog
                .features_for_tier(tier)
                .enabled()
                .map(str::to_string)
                .collect(),
        }
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Parse from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// Write `<dir>/<tier>/template.yaml` for every tier of the catalog
///
/// Returns the written paths, lowest tier first.
pub fn export_metadata(catalog: &FeatureCatalog, dir: &Path) -> Result<Vec<PathBuf>> {
    catalog
        .tiers()
        .map(|tier| {
            let tier_dir = dir.join(tier.as_str());
            fs::create_dir_all(&tier_dir).map_err(|e| GenerationError::file_write(&tier_dir, e))?;

            let path = tier_dir.join(METADATA_FILE);
            let yaml = TemplateSetMetadata::for_tier(catalog, tier).to_yaml()?;
            fs::write(&path, yaml).map_err(|e| GenerationError::file_write(&path, e))?;

            debug!(tier = %tier, path = %path.display(), "Exported template metadata");
            Ok(path)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_metadata_lists_enabled_features() {
        let metadata =
            TemplateSetMetadata::for_tier(&FeatureCatalog::standard(), Tier::Intermediate);
        assert_eq!(metadata.name, "health-endpoint-intermediate");
        assert_eq!(
            metadata.features,
            vec!["kubernetes", "typescript", "dependencies", "server_timing"]
        );
        assert!(!metadata.description.is_empty());
    }

    #[test]
    fn test_yaml_round_trip() {
        let metadata = TemplateSetMetadata::for_tier(&FeatureCatalog::standard(), Tier::Enterprise);
        let yaml = metadata.to_yaml().unwrap();
        assert!(yaml.contains("tier: enterprise"));
        assert_eq!(TemplateSetMetadata::from_yaml(&yaml).unwrap(), metadata);
    }

    #[test]
    fn test_from_yaml_rejects_unknown_tier() {
        let yaml = "name: x\ntier: nightly\ndescription: d\nversion: 1.0.0\nfeatures: []\n";
        assert!(matches!(
            TemplateSetMetadata::from_yaml(yaml),
            Err(GenerationError::Metadata(_))
        ));
    }

    #[test]
    fn test_export_writes_one_file_per_tier() {
        let temp_dir = TempDir::new().unwrap();
        let paths = export_metadata(&FeatureCatalog::standard(), temp_dir.path()).unwrap();

        assert_eq!(paths.len(), 4);
        assert_eq!(paths[0], temp_dir.path().join("basic").join(METADATA_FILE));
        let advanced = fs::read_to_string(temp_dir.path().join("advanced/template.yaml")).unwrap();
        assert!(advanced.contains("opentelemetry"));
        assert!(!advanced.contains("mtls"));
    }
}

//! Feature catalog: which features each tier enables
//!
//! Features accumulate tier by tier. A feature is introduced at exactly one
//! tier and stays enabled at every tier above it, so upgrading a project
//! never loses functionality.

use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;
use serde::{ser::SerializeMap, Serialize, Serializer};

use crate::{
    error::{GenerationError, Result},
    tier::Tier,
};

/// Names of the standard features
pub mod feature {
    /// Kubernetes deployment and service manifests
    pub const KUBERNETES: &str = "kubernetes";
    /// TypeScript client for the health API
    pub const TYPESCRIPT: &str = "typescript";
    /// Health checks for downstream dependencies
    pub const DEPENDENCIES: &str = "dependencies";
    /// `Server-Timing` response headers
    pub const SERVER_TIMING: &str = "server_timing";
    /// OpenTelemetry tracing
    pub const OPENTELEMETRY: &str = "opentelemetry";
    /// CloudEvents emission on health transitions
    pub const CLOUDEVENTS: &str = "cloudevents";
    /// Mutual TLS
    pub const MTLS: &str = "mtls";
    /// Role-based access control
    pub const RBAC: &str = "rbac";
    /// Audit logging
    pub const AUDIT: &str = "audit";
    /// Compliance reporting
    pub const COMPLIANCE: &str = "compliance";
}

static STANDARD: Lazy<FeatureCatalog> = Lazy::new(FeatureCatalog::standard);

/// Resolve the feature set of a tier using the standard catalog
pub fn features_for_tier(tier: Tier) -> FeatureSet {
    STANDARD.features_for_tier(tier)
}

/// Feature flags resolved for one tier, in catalog order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSet {
    entries: Vec<(String, bool)>,
}

impl FeatureSet {
    /// Whether the named feature is known and enabled
    pub fn is_enabled(&self, name: &str) -> bool {
        self.entries
            .iter()
            .any(|(feature, enabled)| *enabled && feature == name)
    }

    /// Whether the named feature is known to this set at all
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(feature, _)| feature == name)
    }

    /// Enabled feature names, in catalog order
    pub fn enabled(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, enabled)| *enabled)
            .map(|(feature, _)| feature.as_str())
    }

    /// All `(name, enabled)` pairs, in catalog order
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries
            .iter()
            .map(|(feature, enabled)| (feature.as_str(), *enabled))
    }

    /// Whether every feature enabled here is also enabled in `other`
    pub fn is_subset_of(&self, other: &FeatureSet) -> bool {
        self.enabled().all(|feature| other.is_enabled(feature))
    }

    /// Features enabled here that are not enabled in `other`
    pub fn added_since(&self, other: &FeatureSet) -> BTreeSet<String> {
        self.enabled()
            .filter(|feature| !other.is_enabled(feature))
            .map(str::to_string)
            .collect()
    }

    /// Number of known features
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set knows no features
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for FeatureSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (feature, enabled) in &self.entries {
            map.serialize_entry(feature, enabled)?;
        }
        map.end()
    }
}

/// Static mapping from tier to the features it introduces
#[derive(Debug, Clone)]
pub struct FeatureCatalog {
    /// Features introduced per tier, tiers lowest first
    introduced: Vec<(Tier, Vec<String>)>,
    descriptions: BTreeMap<Tier, String>,
}

impl FeatureCatalog {
    /// The catalog shipped with the built-in templates
    pub fn standard() -> Self {
        use feature::*;

        Self {
            introduced: vec![
                (Tier::Basic, vec![KUBERNETES.into(), TYPESCRIPT.into()]),
                (
                    Tier::Intermediate,
                    vec![DEPENDENCIES.into(), SERVER_TIMING.into()],
                ),
                (Tier::Advanced, vec![OPENTELEMETRY.into(), CLOUDEVENTS.into()]),
                (
                    Tier::Enterprise,
                    vec![MTLS.into(), RBAC.into(), AUDIT.into(), COMPLIANCE.into()],
                ),
            ],
            descriptions: BTreeMap::from([
                (
                    Tier::Basic,
                    "Health endpoints with Kubernetes manifests and a TypeScript client"
                        .to_string(),
                ),
                (
                    Tier::Intermediate,
                    "Adds dependency health checks and Server-Timing headers".to_string(),
                ),
                (
                    Tier::Advanced,
                    "Adds OpenTelemetry tracing and CloudEvents notifications".to_string(),
                ),
                (
                    Tier::Enterprise,
                    "Adds mTLS, RBAC, audit logging and compliance reporting".to_string(),
                ),
            ]),
        }
    }

    /// Start an empty catalog
    pub fn builder() -> FeatureCatalogBuilder {
        FeatureCatalogBuilder::default()
    }

    /// Resolve the feature set of a tier
    pub fn features_for_tier(&self, tier: Tier) -> FeatureSet {
        let entries = self
            .introduced
            .iter()
            .flat_map(|(introduced_at, features)| {
                features
                    .iter()
                    .map(move |feature| (feature.clone(), *introduced_at <= tier))
            })
            .collect();

        FeatureSet { entries }
    }

    /// Resolve the feature set of a tier given by name
    pub fn features_for_tier_name(&self, tier: &str) -> Result<FeatureSet> {
        Ok(self.features_for_tier(tier.parse()?))
    }

    /// Tier that introduces the named feature
    pub fn introduced_at(&self, feature: &str) -> Option<Tier> {
        self.introduced
            .iter()
            .find(|(_, features)| features.iter().any(|f| f == feature))
            .map(|(tier, _)| *tier)
    }

    /// Every feature in catalog order
    pub fn all_features(&self) -> impl Iterator<Item = &str> {
        self.introduced
            .iter()
            .flat_map(|(_, features)| features.iter().map(String::as_str))
    }

    /// Tiers known to the catalog, lowest first
    pub fn tiers(&self) -> impl Iterator<Item = Tier> + '_ {
        self.introduced.iter().map(|(tier, _)| *tier)
    }

    /// Human-readable summary of a tier
    pub fn description(&self, tier: Tier) -> &str {
        self.descriptions
            .get(&tier)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

impl Default for FeatureCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Builder for custom catalogs
#[derive(Debug, Default)]
pub struct FeatureCatalogBuilder {
    introduced: BTreeMap<Tier, Vec<String>>,
    descriptions: BTreeMap<Tier, String>,
}

impl FeatureCatalogBuilder {
    /// Introduce features at a tier
    pub fn introduce<I, S>(mut self, tier: Tier, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.introduced
            .entry(tier)
            .or_default()
            .extend(features.into_iter().map(Into::into));
        self
    }

    /// Describe a tier
    pub fn describe(mut self, tier: Tier, description: impl Into<String>) -> Self {
        self.descriptions.insert(tier, description.into());
        self
    }

    /// Build the catalog, rejecting features introduced more than once
    pub fn build(self) -> Result<FeatureCatalog> {
        let mut seen: BTreeMap<String, Tier> = BTreeMap::new();
        for (tier, features) in &self.introduced {
            for feature in features {
                if let Some(first) = seen.insert(feature.clone(), *tier) {
                    return Err(GenerationError::DuplicateFeature {
                        feature: feature.clone(),
                        tier: first,
                    });
                }
            }
        }

        let introduced = Tier::ALL
            .iter()
            .map(|tier| (*tier, self.introduced.get(tier).cloned().unwrap_or_default()))
            .collect();

        Ok(FeatureCatalog {
            introduced,
            descriptions: self.descriptions,
        })
    }
}

//! Tier migration planning and application
//!
//! A migration upgrades an existing project to a higher tier by generating
//! only the files the higher tier adds. Files already present are never
//! touched and nothing is deleted.

use std::{collections::BTreeSet, path::Path};

use tracing::info;

use crate::{
    context::GenerationContext,
    error::{GenerationError, Result},
    features::FeatureCatalog,
    generator::ProjectGenerator,
    output_writer::ConflictPolicy,
    registry::TemplateDescriptor,
    report::GenerationReport,
    tier::Tier,
};

/// Files and features needed to move a project between tiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationDelta {
    /// Tier the project is on
    pub from_tier: Tier,
    /// Tier the project moves to
    pub to_tier: Tier,
    /// Features enabled at `to_tier` but not at `from_tier`
    pub added_features: BTreeSet<String>,
    /// Templates that apply at `to_tier` but not at `from_tier`, in
    /// registration order
    pub added_templates: Vec<TemplateDescriptor>,
}

impl MigrationDelta {
    /// Names of the added templates
    pub fn template_names(&self) -> impl Iterator<Item = &str> {
        self.added_templates.iter().map(TemplateDescriptor::name)
    }

    /// Whether the migration adds no files
    pub fn is_empty(&self) -> bool {
        self.added_templates.is_empty()
    }
}

/// Computes and applies tier upgrades
#[derive(Debug, Clone)]
pub struct MigrationPlanner {
    generator: ProjectGenerator,
    catalog: FeatureCatalog,
}

impl MigrationPlanner {
    /// Planner over the built-in templates and standard catalog
    pub fn new() -> Result<Self> {
        Ok(Self::with_parts(ProjectGenerator::new()?, FeatureCatalog::standard()))
    }

    /// Planner over a custom generator and catalog
    pub fn with_parts(generator: ProjectGenerator, catalog: FeatureCatalog) -> Self {
        Self { generator, catalog }
    }

    /// Delta between two tiers; only upgrades are allowed
    pub fn plan(&self, from: Tier, to: Tier) -> Result<MigrationDelta> {
        if to <= from {
            return Err(GenerationError::InvalidMigration {
                from,
                to,
                reason: "target tier must be higher than the current tier".to_string(),
            });
        }

        let from_features = self.catalog.features_for_tier(from);
        let to_features = self.catalog.features_for_tier(to);

        let added_templates = self
            .generator
            .registry()
            .iter()
            .filter(|d| d.applies_to(&to_features) && !d.applies_to(&from_features))
            .cloned()
            .collect();

        Ok(MigrationDelta {
            from_tier: from,
            to_tier: to,
            added_features: to_features.added_since(&from_features),
            added_templates,
        })
    }

    /// [`plan`](Self::plan) with tiers given by name
    pub fn plan_by_name(&self, from: &str, to: &str) -> Result<MigrationDelta> {
        self.plan(from.parse()?, to.parse()?)
    }

    /// Write the delta's templates into an existing project
    ///
    /// The context must have been built for `delta.to_tier`. Existing files
    /// are reported as skipped.
    pub fn apply(
        &self,
        delta: &MigrationDelta,
        project_root: &Path,
        context: &GenerationContext,
    ) -> Result<GenerationReport> {
        if !project_root.is_dir() {
            return Err(GenerationError::ProjectNotFound(project_root.to_path_buf()));
        }
        if context.tier() != delta.to_tier {
            return Err(GenerationError::InvalidMigration {
                from: delta.from_tier,
                to: delta.to_tier,
                reason: format!("context was built for tier {}", context.tier()),
            });
        }

        info!(
            from = %delta.from_tier,
            to = %delta.to_tier,
            root = %project_root.display(),
            templates = delta.added_templates.len(),
            "Applying tier migration"
        );

        let descriptors: Vec<&TemplateDescriptor> = delta.added_templates.iter().collect();
        let report = self
            .generator
            .run(&descriptors, context, project_root, ConflictPolicy::Skip)?;

        info!(to = %delta.to_tier, "Migration finished: {}", report.summary());
        Ok(report)
    }
}

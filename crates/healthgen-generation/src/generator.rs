//! Generation orchestrator
//!
//! Drives one run: pick the descriptors the context's features enable, render
//! all of them in memory, then hand the batch to the output writer. A render
//! failure aborts the run before anything is written.

use std::{
    collections::HashMap,
    io,
    path::{Path, PathBuf},
};

use serde_json::Value;
use tracing::{debug, info};

use crate::{
    classifier::FileClassifier,
    context::GenerationContext,
    error::{GenerationError, Result},
    output_writer::{ConflictPolicy, OutputFile, OutputWriter, OutputWriterConfig},
    registry::{TemplateDescriptor, TemplateRegistry},
    report::GenerationReport,
    templates::TemplateEngine,
};

/// Configuration for the project generator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Render and report without writing
    pub dry_run: bool,
}

/// Renders and writes project trees
#[derive(Debug, Clone)]
pub struct ProjectGenerator {
    registry: TemplateRegistry,
    classifier: FileClassifier,
    engine: TemplateEngine,
    config: GeneratorConfig,
}

impl ProjectGenerator {
    /// Generator over the built-in template set
    pub fn new() -> Result<Self> {
        Self::with_registry(TemplateRegistry::builtin()?)
    }

    /// Generator over a custom registry
    ///
    /// Every body that will be substituted is parsed up front.
    pub fn with_registry(registry: TemplateRegistry) -> Result<Self> {
        let classifier = FileClassifier::new();
        registry.validate(&classifier)?;
        Ok(Self {
            registry,
            classifier,
            engine: TemplateEngine::new(),
            config: GeneratorConfig::default(),
        })
    }

    /// Sets the generator configuration
    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Template registry in use
    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    /// File classifier in use
    pub fn classifier(&self) -> &FileClassifier {
        &self.classifier
    }

    /// Generate a complete project for the context's tier under `root`
    ///
    /// Existing files are overwritten.
    pub fn generate(&self, context: &GenerationContext, root: &Path) -> Result<GenerationReport> {
        let descriptors = self.registry.resolve_for_feature_set(context.features());

        info!(
            tier = %context.tier(),
            project = context.project_name(),
            root = %root.display(),
            templates = descriptors.len(),
            dry_run = self.config.dry_run,
            "Generating project"
        );

        let report = self.run(&descriptors, context, root, ConflictPolicy::Overwrite)?;
        info!(tier = %report.tier, "Generation finished: {}", report.summary());
        Ok(report)
    }

    /// Render descriptors against a context without writing anything
    pub fn render(
        &self,
        descriptors: &[&TemplateDescriptor],
        context: &GenerationContext,
    ) -> Result<Vec<OutputFile>> {
        let namespace = context.namespace();
        let mut claimed: HashMap<PathBuf, &str> = HashMap::new();
        let mut files = Vec::with_capacity(descriptors.len());

        for descriptor in descriptors {
            let file = self.render_one(descriptor, &namespace)?;
            if let Some(previous) = claimed.insert(file.path.clone(), descriptor.name()) {
                return Err(GenerationError::file_write(
                    &file.path,
                    io::Error::new(
                        io::ErrorKind::AlreadyExists,
                        format!(
                            "templates '{}' and '{}' produce the same path",
                            previous,
                            descriptor.name()
                        ),
                    ),
                ));
            }
            files.push(file);
        }

        Ok(files)
    }

    /// Shared render-then-write path for generation and migration
    pub(crate) fn run(
        &self,
        descriptors: &[&TemplateDescriptor],
        context: &GenerationContext,
        root: &Path,
        conflict_policy: ConflictPolicy,
    ) -> Result<GenerationReport> {
        let files = self.render(descriptors, context)?;

        let writer = OutputWriter::with_config(OutputWriterConfig {
            dry_run: self.config.dry_run,
            conflict_policy,
        });
        let reports = writer.write(&files, root)?;

        Ok(GenerationReport {
            tier: context.tier(),
            features: context.features().clone(),
            generated_at: context.generated_at(),
            dry_run: self.config.dry_run,
            files: reports,
        })
    }

    fn render_one(&self, descriptor: &TemplateDescriptor, namespace: &Value) -> Result<OutputFile> {
        let registered = descriptor.relative_output_path();
        let path = self.classifier.output_path(registered);

        if !self.classifier.needs_substitution(registered) {
            debug!(template = descriptor.name(), path = %path.display(), "Copying verbatim");
            return Ok(OutputFile {
                template: descriptor.name().to_string(),
                path,
                contents: descriptor.body().to_vec(),
                processed: false,
            });
        }

        let rendered = self
            .engine
            .render(descriptor.text()?, namespace)
            .map_err(|e| GenerationError::template(descriptor.name(), e))?;

        debug!(template = descriptor.name(), path = %path.display(), "Rendered template");
        Ok(OutputFile {
            template: descriptor.name().to_string(),
            path,
            contents: rendered.into_bytes(),
            processed: true,
        })
    }
}

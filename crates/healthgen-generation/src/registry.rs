//! Template registry: the ordered set of candidate output files

use std::{
    borrow::Cow,
    collections::HashMap,
    path::{Component, Path},
};

use crate::{
    builtin,
    classifier::FileClassifier,
    error::{GenerationError, Result},
    features::FeatureSet,
    templates::TemplateParser,
};

/// One candidate output artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDescriptor {
    name: String,
    relative_output_path: String,
    body: Cow<'static, [u8]>,
    required_feature: Option<String>,
}

impl TemplateDescriptor {
    /// Descriptor that is always included
    pub fn new(
        name: impl Into<String>,
        relative_output_path: impl Into<String>,
        body: impl Into<Cow<'static, [u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            relative_output_path: relative_output_path.into(),
            body: body.into(),
            required_feature: None,
        }
    }

    /// Gate the descriptor on a feature
    pub fn requires(mut self, feature: impl Into<String>) -> Self {
        self.required_feature = Some(feature.into());
        self
    }

    /// Unique template name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Output path relative to the project root, as registered
    pub fn relative_output_path(&self) -> &Path {
        Path::new(&self.relative_output_path)
    }

    /// Raw template body
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as text, for templates that go through substitution
    pub(crate) fn text(&self) -> Result<&str> {
        std::str::from_utf8(&self.body).map_err(|e| GenerationError::TemplateSyntax {
            template: self.name.clone(),
            line: 0,
            message: format!("body is not valid UTF-8: {e}"),
        })
    }

    /// Feature gating this descriptor, if any
    pub fn required_feature(&self) -> Option<&str> {
        self.required_feature.as_deref()
    }

    /// Whether the descriptor applies to a feature set
    pub fn applies_to(&self, features: &FeatureSet) -> bool {
        self.required_feature
            .as_deref()
            .map_or(true, |feature| features.is_enabled(feature))
    }
}

/// Ordered mapping from template name to descriptor
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    descriptors: Vec<TemplateDescriptor>,
    index: HashMap<String, usize>,
}

impl TemplateRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in health endpoint templates
    pub fn builtin() -> Result<Self> {
        let mut registry = Self::new();
        for descriptor in builtin::descriptors() {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    /// Register a descriptor
    ///
    /// Fails on a name that is already taken or on an output path that is
    /// absolute or climbs out of the project root.
    pub fn register(&mut self, descriptor: TemplateDescriptor) -> Result<()> {
        if self.index.contains_key(descriptor.name()) {
            return Err(GenerationError::DuplicateTemplateName(
                descriptor.name().to_string(),
            ));
        }

        let path = descriptor.relative_output_path();
        let contained = !descriptor.relative_output_path.is_empty()
            && path
                .components()
                .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
        if !contained {
            return Err(GenerationError::InvalidTemplatePath {
                name: descriptor.name.clone(),
                path: descriptor.relative_output_path.clone(),
            });
        }

        self.index
            .insert(descriptor.name.clone(), self.descriptors.len());
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Descriptors applicable to a feature set, in registration order
    pub fn resolve_for_feature_set(&self, features: &FeatureSet) -> Vec<&TemplateDescriptor> {
        self.descriptors
            .iter()
            .filter(|descriptor| descriptor.applies_to(features))
            .collect()
    }

    /// Look up a descriptor by name
    pub fn get(&self, name: &str) -> Option<&TemplateDescriptor> {
        self.index.get(name).map(|&i| &self.descriptors[i])
    }

    /// All descriptors in registration order
    pub fn iter(&self) -> impl Iterator<Item = &TemplateDescriptor> {
        self.descriptors.iter()
    }

    /// Number of registered descriptors
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Parse every body the classifier would substitute, so syntax errors
    /// surface when the registry is built rather than mid-generation
    pub fn validate(&self, classifier: &FileClassifier) -> Result<()> {
        for descriptor in &self.descriptors {
            if !classifier.needs_substitution(descriptor.relative_output_path()) {
                continue;
            }

            TemplateParser::parse(descriptor.text()?)
                .map_err(|e| GenerationError::template(descriptor.name(), e))?;
        }
        Ok(())
    }
}

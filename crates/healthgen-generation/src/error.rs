//! Error types for project generation

use std::path::PathBuf;

use thiserror::Error;

use crate::{templates::TemplateError, tier::Tier};

/// Generation result type
pub type Result<T> = std::result::Result<T, GenerationError>;

/// Errors that can occur while building, generating or migrating a project
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Unrecognized tier name
    #[error("Invalid tier '{0}' (expected one of: basic, intermediate, advanced, enterprise)")]
    InvalidTier(String),

    /// Project name is empty or not a conservative identifier
    #[error("Invalid project name '{0}': use letters, digits and hyphens")]
    InvalidProjectName(String),

    /// Module URI is empty or malformed
    #[error("Invalid module URI '{uri}': {reason}")]
    InvalidModuleUri {
        /// Offending URI
        uri: String,
        /// What is wrong with it
        reason: String,
    },

    /// Two templates registered under the same name
    #[error("Duplicate template name: {0}")]
    DuplicateTemplateName(String),

    /// Template output path is absolute or escapes the output root
    #[error("Template '{name}' has an invalid output path: {path}")]
    InvalidTemplatePath {
        /// Template name
        name: String,
        /// Rejected relative output path
        path: String,
    },

    /// A feature introduced at more than one tier
    #[error("Feature '{feature}' is already introduced at tier {tier}")]
    DuplicateFeature {
        /// Feature name
        feature: String,
        /// Tier that already introduces it
        tier: Tier,
    },

    /// Template references a variable the context does not provide
    #[error("Template '{template}' references undefined variable {variable}")]
    UndefinedVariable {
        /// Template name
        template: String,
        /// Dotted variable path, e.g. `.Config.NonExistentField`
        variable: String,
    },

    /// Template body could not be parsed or rendered
    #[error("Template '{template}' is invalid at line {line}: {message}")]
    TemplateSyntax {
        /// Template name
        template: String,
        /// Line number of the error
        line: usize,
        /// Error message
        message: String,
    },

    /// Filesystem failure while writing output
    #[error("Failed to write {}: {source}", path.display())]
    FileWrite {
        /// Path being written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Requested tier transition is not an upgrade
    #[error("Invalid migration from {from} to {to}: {reason}")]
    InvalidMigration {
        /// Source tier
        from: Tier,
        /// Target tier
        to: Tier,
        /// Why the migration was rejected
        reason: String,
    },

    /// Migration target directory does not exist
    #[error("Project directory not found: {}", .0.display())]
    ProjectNotFound(PathBuf),

    /// Template-set metadata could not be serialized or parsed
    #[error("Metadata error: {0}")]
    Metadata(#[from] serde_yaml::Error),
}

impl GenerationError {
    pub(crate) fn file_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Attach the template name to an engine error
    pub(crate) fn template(name: &str, error: TemplateError) -> Self {
        match error {
            TemplateError::InvalidSyntax { line, message } => Self::TemplateSyntax {
                template: name.to_string(),
                line,
                message,
            },
            TemplateError::UndefinedVariable(variable) => Self::UndefinedVariable {
                template: name.to_string(),
                variable,
            },
            TemplateError::RenderError(message) => Self::TemplateSyntax {
                template: name.to_string(),
                line: 0,
                message,
            },
        }
    }
}

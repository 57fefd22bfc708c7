#![warn(missing_docs)]

//! Tiered project generation for health endpoint services
//!
//! Resolves which features a tier enables, selects the templates those
//! features gate, renders them against a validated variable context and writes
//! the project tree. Projects can later be migrated to a higher tier, which
//! adds only the files the new tier introduces.

mod builtin;

pub mod classifier;
pub mod context;
pub mod error;
pub mod features;
pub mod generator;
pub mod metadata;
pub mod migration;
pub mod output_writer;
pub mod registry;
pub mod report;
pub mod templates;
pub mod tier;
pub mod validation;

// Re-export public API
pub use classifier::FileClassifier;
pub use context::{ContextBuilder, GenerationConfig, GenerationContext};
pub use error::{GenerationError, Result};
pub use features::{feature, features_for_tier, FeatureCatalog, FeatureCatalogBuilder, FeatureSet};
pub use generator::{GeneratorConfig, ProjectGenerator};
pub use metadata::{export_metadata, TemplateSetMetadata};
pub use migration::{MigrationDelta, MigrationPlanner};
pub use output_writer::{ConflictPolicy, OutputFile, OutputWriter, OutputWriterConfig};
pub use registry::{TemplateDescriptor, TemplateRegistry};
pub use report::{FileReport, GenerationReport, WriteStatus};
pub use templates::{TemplateEngine, TemplateError};
pub use tier::Tier;
pub use validation::{validate_project, ProjectValidation, ProjectValidator};

//! Template language for the built-in project templates
//!
//! Bodies use Go-template-style actions: `{{.Config.Name}}` variable
//! references with optional case pipes, `{{if .Features.x}}` blocks and
//! `{{/* comments */}}`. Resolution is strict: an unknown variable is an
//! error, never an empty string.

pub mod engine;
pub mod error;
pub mod parser;
pub mod resolver;

pub use engine::TemplateEngine;
pub use error::TemplateError;
pub use parser::{Condition, ParsedTemplate, TemplateElement, TemplateParser, VariableRef};
pub use resolver::{CaseTransform, ValueResolver};

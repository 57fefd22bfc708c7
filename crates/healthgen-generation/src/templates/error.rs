//! Template error types

use thiserror::Error;

/// Errors raised while parsing or rendering a template body
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// Malformed template syntax
    #[error("Invalid template syntax at line {line}: {message}")]
    InvalidSyntax {
        /// Line number where the syntax error occurred
        line: usize,
        /// Error message describing the syntax issue
        message: String,
    },

    /// Variable path not present in the rendering context
    #[error("Undefined variable: {0}")]
    UndefinedVariable(String),

    /// Value exists but cannot be rendered as text
    #[error("Render error: {0}")]
    RenderError(String),
}

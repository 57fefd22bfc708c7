//! Template engine for rendering templates with variable substitution
//!
//! Provides template rendering with support for:
//! - Variable substitution with case transformations (`{{.Config.Name | snake}}`)
//! - Conditional blocks (`{{if .Features.mtls}}...{{else}}...{{end}}`)
//! - Comments (`{{/* ... */}}`)

use serde_json::Value;

use crate::templates::{
    error::TemplateError,
    parser::{ParsedTemplate, TemplateElement, TemplateParser},
    resolver::ValueResolver,
};

/// Strict template engine.
///
/// Every variable a template references must exist in the context, including
/// variables inside branches that are not taken.
#[derive(Debug, Clone, Default)]
pub struct TemplateEngine;

impl TemplateEngine {
    /// Create a new template engine
    pub fn new() -> Self {
        Self
    }

    /// Render a template with the provided context
    ///
    /// # Arguments
    /// * `template_content` - The template content to render
    /// * `context` - The variable namespace
    ///
    /// # Returns
    /// Rendered content or error
    pub fn render(&self, template_content: &str, context: &Value) -> Result<String, TemplateError> {
        let parsed = TemplateParser::parse(template_content)?;
        self.render_parsed(&parsed, context)
    }

    /// Render an already parsed template
    pub fn render_parsed(
        &self,
        parsed: &ParsedTemplate,
        context: &Value,
    ) -> Result<String, TemplateError> {
        if let Some(variable) = self.undefined_variables(parsed, context).into_iter().next() {
            return Err(TemplateError::UndefinedVariable(variable));
        }

        let resolver = ValueResolver::new(context);
        let mut output = String::new();
        self.render_elements(&parsed.elements, &resolver, &mut output)?;
        Ok(output)
    }

    /// Variables referenced by the template that the context does not define,
    /// in sorted order
    pub fn undefined_variables(&self, parsed: &ParsedTemplate, context: &Value) -> Vec<String> {
        let resolver = ValueResolver::new(context);
        parsed
            .variables
            .iter()
            .filter(|variable| {
                let path: Vec<String> = variable[1..].split('.').map(str::to_string).collect();
                resolver.lookup(&path).is_err()
            })
            .cloned()
            .collect()
    }

    /// Render template elements recursively
    fn render_elements(
        &self,
        elements: &[TemplateElement],
        resolver: &ValueResolver<'_>,
        output: &mut String,
    ) -> Result<(), TemplateError> {
        for element in elements {
            match element {
                TemplateElement::Text(text) => output.push_str(text),
                TemplateElement::Variable(variable) => {
                    output.push_str(&resolver.resolve(&variable.path, &variable.transforms)?);
                }
                TemplateElement::Conditional {
                    condition,
                    then_branch,
                    else_branch,
                } => {
                    let holds = resolver.is_truthy(&condition.path)? != condition.negated;
                    let branch = if holds { then_branch } else { else_branch };
                    self.render_elements(branch, resolver, output)?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn context() -> Value {
        json!({
            "Config": {"Name": "svc-a", "GoModule": "example.com/svc-a"},
            "Features": {"mtls": false, "server_timing": true},
        })
    }

    #[test]
    fn test_render_variable() {
        let engine = TemplateEngine::new();
        let result = engine.render("module {{.Config.GoModule}}", &context());
        assert_eq!(result.unwrap(), "module example.com/svc-a");
    }

    #[test]
    fn test_render_pipes() {
        let engine = TemplateEngine::new();
        let result = engine.render("type {{.Config.Name | pascal}}Client struct{}", &context());
        assert_eq!(result.unwrap(), "type SvcAClient struct{}");
    }

    #[test]
    fn test_render_conditionals() {
        let engine = TemplateEngine::new();
        let template = concat!(
            "{{if .Features.server_timing}}timing{{end}}|",
            "{{if .Features.mtls}}tls{{else}}plain{{end}}|",
            "{{if not .Features.mtls}}open{{end}}",
        );
        assert_eq!(engine.render(template, &context()).unwrap(), "timing|plain|open");
    }

    #[test]
    fn test_undefined_variable_is_error() {
        let engine = TemplateEngine::new();
        let result = engine.render("{{.Config.NonExistentField}}", &context());
        assert_eq!(
            result,
            Err(TemplateError::UndefinedVariable(".Config.NonExistentField".to_string()))
        );
    }

    #[test]
    fn test_undefined_variable_in_untaken_branch_is_error() {
        let engine = TemplateEngine::new();
        let result = engine.render("{{if .Features.mtls}}{{.Config.Missing}}{{end}}", &context());
        assert!(matches!(result, Err(TemplateError::UndefinedVariable(_))));
    }

    #[test]
    fn test_undefined_variables_listing() {
        let engine = TemplateEngine::new();
        let parsed = TemplateParser::parse("{{.B}}{{.Config.Name}}{{.A}}").unwrap();
        assert_eq!(engine.undefined_variables(&parsed, &context()), vec![".A", ".B"]);
    }

    #[test]
    fn test_render_is_deterministic() {
        let engine = TemplateEngine::new();
        let template = "{{.Config.Name}} {{.Config.Name | snake}}";
        let first = engine.render(template, &context()).unwrap();
        let second = engine.render(template, &context()).unwrap();
        assert_eq!(first, second);
    }
}

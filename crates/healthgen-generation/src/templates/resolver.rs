//! Variable resolution and case transformation

use serde_json::Value;

use crate::templates::error::TemplateError;

/// Case transformation applied through a pipe, e.g. `{{.Config.Name | pascal}}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseTransform {
    /// PascalCase (e.g., MyProject)
    PascalCase,
    /// camelCase (e.g., myProject)
    CamelCase,
    /// snake_case (e.g., my_project)
    SnakeCase,
    /// kebab-case (e.g., my-project)
    KebabCase,
    /// UPPERCASE (e.g., MY-PROJECT)
    UpperCase,
    /// lowercase (e.g., my-project)
    LowerCase,
}

impl CaseTransform {
    /// Look up a transform by its pipe name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pascal" => Some(CaseTransform::PascalCase),
            "camel" => Some(CaseTransform::CamelCase),
            "snake" => Some(CaseTransform::SnakeCase),
            "kebab" => Some(CaseTransform::KebabCase),
            "upper" => Some(CaseTransform::UpperCase),
            "lower" => Some(CaseTransform::LowerCase),
            _ => None,
        }
    }

    /// Apply case transformation to a string
    pub fn apply(&self, input: &str) -> String {
        use heck::{ToKebabCase, ToLowerCamelCase, ToPascalCase, ToSnakeCase};

        match self {
            CaseTransform::PascalCase => input.to_pascal_case(),
            CaseTransform::CamelCase => input.to_lower_camel_case(),
            CaseTransform::SnakeCase => input.to_snake_case(),
            CaseTransform::KebabCase => input.to_kebab_case(),
            CaseTransform::UpperCase => input.to_uppercase(),
            CaseTransform::LowerCase => input.to_lowercase(),
        }
    }
}

/// Resolves dotted variable paths against a JSON namespace
#[derive(Debug, Clone, Copy)]
pub struct ValueResolver<'a> {
    root: &'a Value,
}

impl<'a> ValueResolver<'a> {
    /// Create a resolver over a namespace value
    pub fn new(root: &'a Value) -> Self {
        Self { root }
    }

    /// Look up a path such as `["Config", "Name"]`.
    ///
    /// Missing keys and `null` values are both undefined.
    pub fn lookup(&self, path: &[String]) -> Result<&'a Value, TemplateError> {
        let mut current = self.root;
        for segment in path {
            current = current
                .get(segment.as_str())
                .ok_or_else(|| TemplateError::UndefinedVariable(dotted(path)))?;
        }

        if current.is_null() {
            return Err(TemplateError::UndefinedVariable(dotted(path)));
        }
        Ok(current)
    }

    /// Resolve a path to text and run it through the transforms
    pub fn resolve(
        &self,
        path: &[String],
        transforms: &[CaseTransform],
    ) -> Result<String, TemplateError> {
        let value = self.lookup(path)?;
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            _ => {
                return Err(TemplateError::RenderError(format!(
                    "{} is not a scalar value",
                    dotted(path)
                )))
            }
        };

        Ok(transforms
            .iter()
            .fold(text, |text, transform| transform.apply(&text)))
    }

    /// Evaluate a path as a condition
    pub fn is_truthy(&self, path: &[String]) -> Result<bool, TemplateError> {
        Ok(match self.lookup(path)? {
            Value::Bool(b) => *b,
            Value::String(s) => !s.is_empty(),
            Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
            Value::Array(items) => !items.is_empty(),
            Value::Object(fields) => !fields.is_empty(),
            Value::Null => false,
        })
    }
}

/// Render a path in template notation, e.g. `.Config.Name`
pub(crate) fn dotted(path: &[String]) -> String {
    path.iter().map(|segment| format!(".{segment}")).collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn path(s: &str) -> Vec<String> {
        s.split('.').filter(|p| !p.is_empty()).map(str::to_string).collect()
    }

    #[test]
    fn test_case_transforms() {
        assert_eq!(CaseTransform::PascalCase.apply("svc-a"), "SvcA");
        assert_eq!(CaseTransform::CamelCase.apply("svc-a"), "svcA");
        assert_eq!(CaseTransform::SnakeCase.apply("svc-a"), "svc_a");
        assert_eq!(CaseTransform::KebabCase.apply("SvcA"), "svc-a");
        assert_eq!(CaseTransform::UpperCase.apply("svc-a"), "SVC-A");
        assert_eq!(CaseTransform::LowerCase.apply("SVC-A"), "svc-a");
    }

    #[test]
    fn test_transform_names() {
        assert_eq!(CaseTransform::from_name("snake"), Some(CaseTransform::SnakeCase));
        assert_eq!(CaseTransform::from_name("title"), None);
    }

    #[test]
    fn test_resolve_nested_string() {
        let ctx = json!({"Config": {"Name": "svc-a"}});
        let resolver = ValueResolver::new(&ctx);
        assert_eq!(resolver.resolve(&path(".Config.Name"), &[]).unwrap(), "svc-a");
        assert_eq!(
            resolver
                .resolve(&path(".Config.Name"), &[CaseTransform::PascalCase])
                .unwrap(),
            "SvcA"
        );
    }

    #[test]
    fn test_resolve_missing_is_undefined() {
        let ctx = json!({"Config": {"Name": "svc-a"}});
        let resolver = ValueResolver::new(&ctx);
        assert_eq!(
            resolver.resolve(&path(".Config.NonExistentField"), &[]),
            Err(TemplateError::UndefinedVariable(".Config.NonExistentField".to_string()))
        );
    }

    #[test]
    fn test_null_is_undefined() {
        let ctx = json!({"Config": {"Description": null}});
        let resolver = ValueResolver::new(&ctx);
        assert!(matches!(
            resolver.lookup(&path(".Config.Description")),
            Err(TemplateError::UndefinedVariable(_))
        ));
    }

    #[test]
    fn test_composite_values_do_not_render() {
        let ctx = json!({"Config": {"Name": "svc-a"}});
        let resolver = ValueResolver::new(&ctx);
        assert!(matches!(
            resolver.resolve(&path(".Config"), &[]),
            Err(TemplateError::RenderError(_))
        ));
    }

    #[test]
    fn test_truthiness() {
        let ctx = json!({"t": true, "f": false, "s": "", "n": 3, "a": [], "o": {"k": 1}});
        let resolver = ValueResolver::new(&ctx);
        assert!(resolver.is_truthy(&path(".t")).unwrap());
        assert!(!resolver.is_truthy(&path(".f")).unwrap());
        assert!(!resolver.is_truthy(&path(".s")).unwrap());
        assert!(resolver.is_truthy(&path(".n")).unwrap());
        assert!(!resolver.is_truthy(&path(".a")).unwrap());
        assert!(resolver.is_truthy(&path(".o")).unwrap());
        assert!(resolver.is_truthy(&path(".missing")).is_err());
    }
}

//! Template syntax parser
//!
//! Parses template bodies into a tree of text, variable references and
//! conditional blocks, tracking line numbers for error reporting.

use std::collections::BTreeSet;

use crate::templates::{error::TemplateError, resolver::CaseTransform};

/// Reference to a context variable: `{{.Config.Name | pascal}}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableRef {
    /// Path segments, e.g. `["Config", "Name"]`
    pub path: Vec<String>,
    /// Pipes applied left to right
    pub transforms: Vec<CaseTransform>,
    /// Line the reference appears on
    pub line: usize,
}

/// Condition of an `{{if}}` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// Path segments of the tested variable
    pub path: Vec<String>,
    /// `{{if not .X}}`
    pub negated: bool,
    /// Line the condition appears on
    pub line: usize,
}

/// Represents a parsed template element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateElement {
    /// Plain text content
    Text(String),
    /// Variable reference
    Variable(VariableRef),
    /// Conditional block: `{{if .X}}...{{else}}...{{end}}`
    Conditional {
        /// Condition expression
        condition: Condition,
        /// Content rendered when the condition holds
        then_branch: Vec<TemplateElement>,
        /// Content rendered otherwise
        else_branch: Vec<TemplateElement>,
    },
}

/// Parsed template structure
#[derive(Debug, Clone)]
pub struct ParsedTemplate {
    /// Template elements
    pub elements: Vec<TemplateElement>,
    /// Every variable path referenced, in template notation (`.Config.Name`)
    pub variables: BTreeSet<String>,
}

/// Template parser
pub struct TemplateParser;

impl TemplateParser {
    /// Parse template content and extract structure
    ///
    /// # Arguments
    /// * `content` - Template content to parse
    ///
    /// # Returns
    /// Parsed template structure or error with line number
    pub fn parse(content: &str) -> Result<ParsedTemplate, TemplateError> {
        Parser::new(content).parse()
    }

    /// Extract every variable path referenced by a template
    pub fn extract_variables(content: &str) -> Result<BTreeSet<String>, TemplateError> {
        Ok(Self::parse(content)?.variables)
    }

    /// Detect if template has conditionals
    pub fn has_conditionals(content: &str) -> Result<bool, TemplateError> {
        let parsed = Self::parse(content)?;
        Ok(parsed
            .elements
            .iter()
            .any(|e| matches!(e, TemplateElement::Conditional { .. })))
    }
}

enum Action {
    Comment,
    Variable(VariableRef),
    If(Condition),
    Else,
    End,
}

enum Terminator {
    Else,
    End,
    Eof,
}

/// Lexed template piece
enum Token<'a> {
    Text(String),
    Action { inner: &'a str, line: usize },
}

/// Internal parser state
struct Parser<'a> {
    content: &'a str,
    position: usize,
    line: usize,
    tokens: Vec<Token<'a>>,
    cursor: usize,
    /// Line of the most recent action, for terminator errors
    action_line: usize,
    variables: BTreeSet<String>,
}

impl<'a> Parser<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            content,
            position: 0,
            line: 1,
            tokens: Vec::new(),
            cursor: 0,
            action_line: 1,
            variables: BTreeSet::new(),
        }
    }

    fn parse(mut self) -> Result<ParsedTemplate, TemplateError> {
        self.tokens = self.lex()?;
        let (elements, terminator) = self.parse_sequence()?;

        match terminator {
            Terminator::Eof => Ok(ParsedTemplate {
                elements,
                variables: self.variables,
            }),
            Terminator::Else => {
                Err(self.syntax_error(self.action_line, "{{else}} outside of {{if}}"))
            }
            Terminator::End => {
                Err(self.syntax_error(self.action_line, "{{end}} without matching {{if}}"))
            }
        }
    }

    /// Split the content into text and actions, applying `{{-` / `-}}`
    /// whitespace trimming to neighbouring text
    fn lex(&mut self) -> Result<Vec<Token<'a>>, TemplateError> {
        let mut tokens = Vec::new();
        let mut trim_next = false;

        while self.position < self.content.len() {
            if !self.rest().starts_with("{{") {
                let text = self.read_text();
                let text = if trim_next { text.trim_start() } else { text };
                trim_next = false;
                if !text.is_empty() {
                    tokens.push(Token::Text(text.to_string()));
                }
                continue;
            }

            let line = self.line;
            self.advance(2); // {{
            let Some(end) = self.rest().find("}}") else {
                return Err(self.syntax_error(line, "Unterminated action, expected '}}'"));
            };
            let mut inner = &self.rest()[..end];
            self.advance(end + 2);

            if let Some(stripped) = inner
                .strip_prefix('-')
                .filter(|s| s.starts_with(char::is_whitespace))
            {
                inner = stripped;
                if let Some(Token::Text(text)) = tokens.last_mut() {
                    text.truncate(text.trim_end().len());
                    if text.is_empty() {
                        tokens.pop();
                    }
                }
            }
            trim_next = false;
            if let Some(stripped) = inner
                .strip_suffix('-')
                .filter(|s| s.ends_with(char::is_whitespace))
            {
                inner = stripped;
                trim_next = true;
            }

            tokens.push(Token::Action {
                inner: inner.trim(),
                line,
            });
        }

        Ok(tokens)
    }

    fn parse_sequence(&mut self) -> Result<(Vec<TemplateElement>, Terminator), TemplateError> {
        let mut elements = Vec::new();

        while let Some(token) = self.tokens.get(self.cursor) {
            self.cursor += 1;
            let (inner, line) = match token {
                Token::Text(text) => {
                    elements.push(TemplateElement::Text(text.clone()));
                    continue;
                }
                Token::Action { inner, line } => (*inner, *line),
            };

            match self.parse_action(inner, line)? {
                Action::Comment => {}
                Action::Variable(variable) => elements.push(TemplateElement::Variable(variable)),
                Action::If(condition) => elements.push(self.parse_conditional(condition)?),
                Action::Else => return Ok((elements, Terminator::Else)),
                Action::End => return Ok((elements, Terminator::End)),
            }
        }

        Ok((elements, Terminator::Eof))
    }

    fn parse_conditional(
        &mut self,
        condition: Condition,
    ) -> Result<TemplateElement, TemplateError> {
        let opened_at = condition.line;
        let unclosed = |parser: &Self| parser.syntax_error(opened_at, "Unclosed {{if}} block");

        let (then_branch, terminator) = self.parse_sequence()?;
        let else_branch = match terminator {
            Terminator::End => Vec::new(),
            Terminator::Eof => return Err(unclosed(self)),
            Terminator::Else => {
                let (else_branch, terminator) = self.parse_sequence()?;
                match terminator {
                    Terminator::End => else_branch,
                    Terminator::Eof => return Err(unclosed(self)),
                    Terminator::Else => {
                        return Err(self.syntax_error(
                            self.action_line,
                            "Duplicate {{else}} in {{if}} block",
                        ))
                    }
                }
            }
        };

        Ok(TemplateElement::Conditional {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn parse_action(&mut self, action: &str, line: usize) -> Result<Action, TemplateError> {
        self.action_line = line;

        if let Some(comment) = action.strip_prefix("/*") {
            if !comment.ends_with("*/") {
                return Err(self.syntax_error(line, "Unterminated comment, expected '*/'"));
            }
            return Ok(Action::Comment);
        }

        match action {
            "else" => return Ok(Action::Else),
            "end" => return Ok(Action::End),
            _ => {}
        }

        if let Some(condition) = action.strip_prefix("if ") {
            let condition = condition.trim();
            let (negated, expr) = match condition.strip_prefix("not ") {
                Some(expr) => (true, expr.trim()),
                None => (false, condition),
            };
            let path = self.parse_path(expr, line)?;
            return Ok(Action::If(Condition { path, negated, line }));
        }

        if action.starts_with('.') {
            let mut pipeline = action.split('|');
            let path = self.parse_path(pipeline.next().unwrap_or_default(), line)?;
            let transforms = pipeline
                .map(|name| {
                    let name = name.trim();
                    CaseTransform::from_name(name).ok_or_else(|| {
                        self.syntax_error(line, format!("Unknown transform '{name}'"))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Action::Variable(VariableRef {
                path,
                transforms,
                line,
            }));
        }

        Err(self.syntax_error(line, format!("Unknown action '{{{{{action}}}}}'")))
    }

    fn parse_path(&mut self, expr: &str, line: usize) -> Result<Vec<String>, TemplateError> {
        let expr = expr.trim();
        let Some(stripped) = expr.strip_prefix('.') else {
            return Err(self.syntax_error(line, format!("Expected variable path, found '{expr}'")));
        };

        let path: Vec<String> = stripped.split('.').map(str::to_string).collect();
        let valid = path.iter().all(|segment| {
            !segment.is_empty() && segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        });
        if !valid {
            return Err(self.syntax_error(line, format!("Invalid variable path '{expr}'")));
        }

        self.variables.insert(format!(".{stripped}"));
        Ok(path)
    }

    fn read_text(&mut self) -> &'a str {
        let rest = self.rest();
        let len = rest.find("{{").unwrap_or(rest.len());
        self.advance(len);
        &rest[..len]
    }

    fn rest(&self) -> &'a str {
        &self.content[self.position..]
    }

    /// Move forward `len` bytes, counting newlines
    fn advance(&mut self, len: usize) {
        let consumed = &self.content[self.position..self.position + len];
        self.line += consumed.matches('\n').count();
        self.position += len;
    }

    fn syntax_error(&self, line: usize, message: impl Into<String>) -> TemplateError {
        TemplateError::InvalidSyntax {
            line,
            message: message.into(),
        }
    }
}

//! Text templates over inspection records.
//!
//! [`FieldTemplate`] implements the subset of Go template syntax users put
//! in `--format`: `{{.Field.Sub}}`, `{{.}}` and `{{json .Field}}`.

use serde_json::Value;
use thiserror::Error;

/// Template failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template: parse error: {0}")]
    Parse(String),

    #[error("template: execution error: {0}")]
    Exec(String),
}

/// Renders a template string against one JSON value.
pub trait TemplateEngine: Send + Sync {
    /// Check the template without executing it.
    fn validate(&self, template: &str) -> Result<(), TemplateError>;

    fn render(&self, template: &str, value: &Value) -> Result<String, TemplateError>;
}

/// Field-reference template engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct FieldTemplate;

#[derive(Debug, PartialEq)]
enum Node {
    Text(String),
    Field(Vec<String>),
    Json(Vec<String>),
}

impl TemplateEngine for FieldTemplate {
    fn validate(&self, template: &str) -> Result<(), TemplateError> {
        parse(template).map(|_| ())
    }

    fn render(&self, template: &str, value: &Value) -> Result<String, TemplateError> {
        let mut out = String::new();
        for node in parse(template)? {
            match node {
                Node::Text(text) => out.push_str(&text),
                Node::Field(path) => out.push_str(&format_value(lookup(value, &path)?)),
                Node::Json(path) => {
                    let v = lookup(value, &path)?;
                    let encoded =
                        serde_json::to_string(v).map_err(|e| TemplateError::Exec(e.to_string()))?;
                    out.push_str(&encoded);
                }
            }
        }
        Ok(out)
    }
}

fn parse(src: &str) -> Result<Vec<Node>, TemplateError> {
    let mut nodes = Vec::new();
    let mut rest = src;

    while let Some(start) = rest.find("{{") {
        if start > 0 {
            nodes.push(Node::Text(rest[..start].to_string()));
        }
        let after_open = &rest[start + 2..];
        let end = after_open
            .find("}}")
            .ok_or_else(|| TemplateError::Parse("unclosed action".to_string()))?;
        nodes.push(parse_action(after_open[..end].trim())?);
        rest = &after_open[end + 2..];
    }

    if !rest.is_empty() {
        nodes.push(Node::Text(rest.to_string()));
    }
    Ok(nodes)
}

fn parse_action(action: &str) -> Result<Node, TemplateError> {
    let tokens: Vec<&str> = action.split_whitespace().collect();
    match tokens.as_slice() {
        [] => Err(TemplateError::Parse("missing value for command".to_string())),
        [field] if field.starts_with('.') => Ok(Node::Field(parse_path(field)?)),
        ["json", field] => Ok(Node::Json(parse_path(field)?)),
        ["json"] | ["json", ..] => Err(TemplateError::Parse(
            "wrong number of args for json: want 1".to_string(),
        )),
        [name, ..] if !name.starts_with('.') => {
            Err(TemplateError::Parse(format!("function {name:?} not defined")))
        }
        _ => Err(TemplateError::Parse(format!("unexpected arguments in {action:?}"))),
    }
}

fn parse_path(token: &str) -> Result<Vec<String>, TemplateError> {
    let bad = || TemplateError::Parse(format!("bad field reference {token:?}"));
    let body = token.strip_prefix('.').ok_or_else(bad)?;
    if body.is_empty() {
        return Ok(Vec::new());
    }

    body.split('.')
        .map(|segment| {
            let valid = !segment.is_empty()
                && segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
            if valid {
                Ok(segment.to_string())
            } else {
                Err(bad())
            }
        })
        .collect()
}

fn lookup<'v>(value: &'v Value, path: &[String]) -> Result<&'v Value, TemplateError> {
    let mut current = value;
    for segment in path {
        current = match current {
            Value::Object(map) => map
                .get(segment)
                .ok_or_else(|| TemplateError::Exec(format!("can't evaluate field {segment}")))?,
            other => {
                return Err(TemplateError::Exec(format!(
                    "can't evaluate field {segment} in type {}",
                    type_name(other)
                )))
            }
        };
    }
    Ok(current)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "nil",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "slice",
        Value::Object(_) => "map",
    }
}

/// Go-style default formatting of a value.
fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "<no value>".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(format_value).collect();
            format!("[{}]", parts.join(" "))
        }
        Value::Object(map) => {
            let mut parts: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{k}:{}", format_value(v)))
                .collect();
            parts.sort();
            format!("map[{}]", parts.join(" "))
        }
    }
}

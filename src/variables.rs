//! Template variables in snippet content
//!
//! Supported syntax:
//! - `{{name}}` - Required variable
//! - `{{name:default}}` - Variable with a default value (everything after the
//!   first colon, so `{{url:https://example.com}}` keeps the full URL)
//!
//! Names are ASCII letters, digits and underscores. Whitespace around a name
//! is ignored (`{{ name }}`), whitespace inside one is not (`{{user name}}` is
//! left as literal text). Anything that doesn't parse as a variable is left
//! untouched.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A variable found in template content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDeclaration {
    pub name: String,
    /// Text after the first colon, verbatim. `None` when there was no colon.
    pub default: Option<String>,
}

impl VariableDeclaration {
    /// True when a value must be supplied because there is no default
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VariableError {
    #[error("No value provided for variable '{name}' and no default specified")]
    MissingValue { name: String },
}

/// One `{{...}}` occurrence, as byte offsets into the content
#[derive(Debug, Clone, Copy)]
struct Token<'a> {
    /// Offset of the opening `{{`
    start: usize,
    /// Offset just past the closing `}}`
    end: usize,
    /// Text between the delimiters
    inner: &'a str,
}

/// Find every `{{...}}`, including ones that start inside another.
///
/// From each `{{` the token extends to the nearest `}}` that leaves a
/// non-empty inner text on a single line. Starting again one byte later means
/// `{{{var}}}` yields both `{{{var}}` and `{{var}}`.
fn scan_tokens(content: &str) -> Vec<Token<'_>> {
    let bytes = content.as_bytes();
    let mut tokens = Vec::new();

    let mut i = 0;
    while i + 1 < bytes.len() {
        if bytes[i] == b'{' && bytes[i + 1] == b'{' {
            let inner_start = i + 2;
            if let Some(close) = find_close(bytes, inner_start) {
                tokens.push(Token {
                    start: i,
                    end: close + 2,
                    inner: &content[inner_start..close],
                });
            }
        }
        i += 1;
    }

    tokens
}

/// Offset of the first `}}` after at least one inner byte, or `None` if a
/// line break or the end of input comes first.
fn find_close(bytes: &[u8], inner_start: usize) -> Option<usize> {
    let mut j = inner_start;
    while j < bytes.len() {
        if j > inner_start && bytes[j] == b'}' && bytes.get(j + 1) == Some(&b'}') {
            return Some(j);
        }
        if bytes[j] == b'\n' {
            return None;
        }
        j += 1;
    }
    None
}

/// Split a token's inner text into a validated name and optional default.
fn parse_inner(inner: &str) -> Option<(&str, Option<&str>)> {
    let (name_part, default) = match inner.split_once(':') {
        Some((name, default)) => (name, Some(default)),
        None => (inner, None),
    };
    let name = name_part.trim();
    is_valid_name(name).then_some((name, default))
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Detect the variables in `content`, in order of first appearance.
///
/// A name that appears more than once is reported once, with the default
/// from its first occurrence.
///
/// # Examples
///
/// ```
/// use quick_snippet::variables::detect_variables;
///
/// let vars = detect_variables("flask --app {{app:app}} --port {{port:5000}} {{app}}");
/// assert_eq!(vars.len(), 2);
/// assert_eq!(vars[0].name, "app");
/// assert_eq!(vars[1].default.as_deref(), Some("5000"));
/// ```
pub fn detect_variables(content: &str) -> Vec<VariableDeclaration> {
    let mut seen = HashSet::new();
    let mut variables = Vec::new();

    for token in scan_tokens(content) {
        let Some((name, default)) = parse_inner(token.inner) else {
            continue;
        };
        if !seen.insert(name) {
            continue;
        }
        variables.push(VariableDeclaration {
            name: name.to_string(),
            default: default.map(str::to_string),
        });
    }

    variables
}

/// True if `content` contains at least one valid variable
pub fn has_variables(content: &str) -> bool {
    scan_tokens(content)
        .iter()
        .any(|token| parse_inner(token.inner).is_some())
}

/// Names of variables that have neither a value in `values` nor a default
pub fn missing_variables(content: &str, values: &HashMap<String, String>) -> Vec<String> {
    detect_variables(content)
        .into_iter()
        .filter(|var| var.is_required() && !values.contains_key(&var.name))
        .map(|var| var.name)
        .collect()
}

/// Replace every variable occurrence with its provided value or default.
///
/// All occurrences of a name get the same value, whatever default text
/// each occurrence carries. Values are inserted literally. If any variable
/// has no value and no default, nothing is substituted and the error names
/// the first such variable.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use quick_snippet::variables::substitute_variables;
///
/// let mut values = HashMap::new();
/// values.insert("port".to_string(), "3000".to_string());
/// let out = substitute_variables("Port: {{port:8080}}, Host: {{host:localhost}}", &values).unwrap();
/// assert_eq!(out, "Port: 3000, Host: localhost");
/// ```
pub fn substitute_variables(
    content: &str,
    values: &HashMap<String, String>,
) -> Result<String, VariableError> {
    let mut resolved: HashMap<String, String> = HashMap::new();
    for var in detect_variables(content) {
        let value = match values.get(&var.name) {
            Some(value) => value.clone(),
            None => match var.default {
                Some(default) => default,
                None => return Err(VariableError::MissingValue { name: var.name }),
            },
        };
        resolved.insert(var.name, value);
    }

    let mut output = String::with_capacity(content.len());
    let mut cursor = 0;

    for token in scan_tokens(content) {
        if token.start < cursor {
            continue;
        }
        let Some((name, _)) = parse_inner(token.inner) else {
            continue;
        };
        let Some(value) = resolved.get(name) else {
            continue;
        };
        output.push_str(&content[cursor..token.start]);
        output.push_str(value);
        cursor = token.end;
    }
    output.push_str(&content[cursor..]);

    Ok(output)
}

//! Entry data access: content-path lookup and frontmatter loading.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{CoreError, Result};

/// Look up a dotted content path (`hero.images.desktop`) in entry data.
///
/// Numeric segments index into arrays.
pub fn lookup<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(data, |node, segment| match node {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}

/// Last segment of a content path.
pub fn path_tail(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}

/// Split an entry file into its YAML frontmatter and body.
pub fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let content = content.trim_start();
    let after_first = content.strip_prefix("---")?;
    let closing_pos = after_first.find("\n---")?;

    let frontmatter = after_first[..closing_pos].trim();
    let body = after_first[closing_pos + 4..].trim_start();
    Some((frontmatter, body))
}

/// Parse an entry's frontmatter into the JSON shape the preview sends.
///
/// Entries without frontmatter yield an empty object.
pub fn parse_entry(content: &str, path: &Path) -> Result<Value> {
    let Some((frontmatter, _body)) = split_frontmatter(content) else {
        return Ok(Value::Object(Map::new()));
    };

    if frontmatter.is_empty() {
        return Ok(Value::Object(Map::new()));
    }

    let yaml: serde_yaml::Value = serde_yaml::from_str(frontmatter)
        .map_err(|e| CoreError::frontmatter(path, e.to_string()))?;

    let value = serde_json::to_value(yaml).map_err(|e| CoreError::frontmatter(path, e.to_string()))?;

    match value {
        Value::Object(_) => Ok(value),
        other => Err(CoreError::frontmatter(
            path,
            format!("expected a mapping, found {}", type_name(&other)),
        )),
    }
}

/// Read and parse an entry file.
pub fn load_entry(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    parse_entry(&content, path)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

//! Key-path lookups into loosely typed upstream JSON.
//!
//! Paths are dotted for error messages (`global.rank.rankScore`). Numeric
//! fields accept numbers, numeric strings, booleans, and `{ "value": .. }`
//! wrappers; text fields accept scalars and the same wrappers.

use serde_json::Value;

use crate::error::{ExporterError, Result};

/// Walk `path` from `root`, failing with the dotted path of the first missing key.
pub fn lookup<'a>(root: &'a Value, path: &[&str]) -> Result<&'a Value> {
    let mut cur = root;
    for (i, key) in path.iter().enumerate() {
        cur = cur
            .get(*key)
            .ok_or_else(|| ExporterError::MissingField(path[..=i].join(".")))?;
    }
    Ok(cur)
}

/// Numeric field at `path`.
pub fn number(root: &Value, path: &[&str]) -> Result<f64> {
    as_number(lookup(root, path)?, &path.join("."))
}

/// Text field at `path`.
pub fn text(root: &Value, path: &[&str]) -> Result<String> {
    as_text(lookup(root, path)?, &path.join("."))
}

pub fn as_number(v: &Value, path: &str) -> Result<f64> {
    match v {
        Value::Number(n) => n.as_f64().ok_or_else(|| type_err(path, "number")),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| type_err(path, "number")),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Object(map) => match map.get("value") {
            Some(inner) => as_number(inner, &format!("{path}.value")),
            None => Err(type_err(path, "number")),
        },
        _ => Err(type_err(path, "number")),
    }
}

pub fn as_text(v: &Value, path: &str) -> Result<String> {
    match v {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        Value::Object(map) => match map.get("value") {
            Some(inner) => as_text(inner, &format!("{path}.value")),
            None => Err(type_err(path, "text")),
        },
        Value::Array(_) => Err(type_err(path, "text")),
    }
}

fn type_err(path: &str, expected: &'static str) -> ExporterError {
    ExporterError::FieldType {
        path: path.to_string(),
        expected,
    }
}

//! Argument sanitizing and validation for a single tool invocation.
//!
//! These are pure functions. `Value::Null` is the absence marker: sanitizing
//! turns blank strings into `Null`, and every later check treats `Null` as
//! "not provided".

use serde_json::{Number, Value};
use std::fmt;
use thiserror::Error;

use crate::domain::Arguments;

/// Declared parameter types that are coerced during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Integer,
    Number,
    Boolean,
}

impl ParamType {
    /// Parse a schema `type` keyword. Types that are not coerced yield `None`.
    #[must_use]
    pub fn from_schema(keyword: &str) -> Option<Self> {
        match keyword {
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            _ => None,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Integer => "an integer",
            Self::Number => "a number",
            Self::Boolean => "a boolean",
        })
    }
}

/// Parameter contract violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One or more required parameters are absent.
    #[error("Missing required parameters for {tool}: {}", .missing.join(", "))]
    MissingParameters { tool: String, missing: Vec<String> },

    /// A parameter could not be coerced to its declared type.
    #[error("Parameter '{param}' must be {expected} for {tool}")]
    InvalidType {
        tool: String,
        param: String,
        expected: ParamType,
    },
}

/// Trim string values; blank strings become the absence marker.
///
/// Non-string values are copied unchanged. Applying this twice yields the
/// same map as applying it once.
pub fn sanitize(arguments: &Arguments) -> Arguments {
    arguments
        .iter()
        .map(|(key, value)| {
            let cleaned = match value {
                Value::String(s) => {
                    let trimmed = s.trim();
                    if trimmed.is_empty() {
                        Value::Null
                    } else {
                        Value::String(trimmed.to_string())
                    }
                }
                other => other.clone(),
            };
            (key.clone(), cleaned)
        })
        .collect()
}

fn is_absent(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Check that every required name is present and not absent.
///
/// All missing names are reported together, in the order they were declared.
pub fn validate_required(
    arguments: &Arguments,
    required: &[String],
    tool_name: &str,
) -> Result<(), ValidationError> {
    let missing: Vec<String> = required
        .iter()
        .filter(|name| is_absent(arguments.get(name.as_str())))
        .cloned()
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingParameters {
            tool: tool_name.to_string(),
            missing,
        })
    }
}

/// Validate declared types, coercing string representations in place.
///
/// Only parameters listed under the schema's `properties` with a coercible
/// `type` are inspected. Absent (`Null`) values are skipped; presence is the
/// job of [`validate_required`].
pub fn validate_types(
    arguments: &mut Arguments,
    schema: &Value,
    tool_name: &str,
) -> Result<(), ValidationError> {
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return Ok(());
    };

    for (param, value) in arguments.iter_mut() {
        let Some(expected) = properties
            .get(param)
            .and_then(|p| p.get("type"))
            .and_then(Value::as_str)
            .and_then(ParamType::from_schema)
        else {
            continue;
        };

        if value.is_null() {
            continue;
        }

        let coerced = match expected {
            ParamType::Integer => coerce_integer(value),
            ParamType::Number => coerce_number(value),
            ParamType::Boolean => coerce_boolean(value),
        };

        match coerced {
            Some(new_value) => *value = new_value,
            None => {
                return Err(ValidationError::InvalidType {
                    tool: tool_name.to_string(),
                    param: param.clone(),
                    expected,
                });
            }
        }
    }

    Ok(())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn coerce_integer(value: &Value) -> Option<Value> {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(value.clone()),
        Value::Number(n) => {
            let f = n.as_f64()?;
            let in_range = f >= i64::MIN as f64 && f <= i64::MAX as f64;
            (f.fract() == 0.0 && in_range).then(|| Value::from(f as i64))
        }
        Value::String(s) => s.trim().parse::<i64>().ok().map(Value::from),
        _ => None,
    }
}

fn coerce_number(value: &Value) -> Option<Value> {
    match value {
        Value::Number(_) => Some(value.clone()),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),
        _ => None,
    }
}

fn coerce_boolean(value: &Value) -> Option<Value> {
    match value {
        Value::Bool(_) => Some(value.clone()),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(Value::Bool(true)),
            "false" | "0" | "no" => Some(Value::Bool(false)),
            _ => None,
        },
        _ => None,
    }
}

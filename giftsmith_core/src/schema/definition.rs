//! Structural checks for a field schema before it is stored.
//!
//! Unlike attribute validation these checks stop at the first problem, so
//! whoever is authoring the schema gets one message to fix at a time.

use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashSet;
use thiserror::Error;

use super::field::{FieldDefinition, FieldKind, FieldSchema, SUPPORTED_FIELD_TYPES};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaDefinitionError {
    #[error("Schema must be a valid JSON object")]
    NotAnObject,

    #[error("Field \"{0}\" must be an object")]
    FieldNotObject(String),

    #[error("Field \"{0}\" must have a valid \"type\" property")]
    MissingType(String),

    #[error("Field \"{key}\" has invalid type \"{field_type}\". Supported types: {supported}", supported = SUPPORTED_FIELD_TYPES.join(", "))]
    UnsupportedType { key: String, field_type: String },

    #[error("Field \"{0}\" of type \"select\" must have an \"options\" array")]
    MissingOptions(String),

    #[error("Field \"{0}\" has a non-string option")]
    NonStringOption(String),

    #[error("Field \"{0}\" has invalid \"min\" value")]
    InvalidMin(String),

    #[error("Field \"{0}\" has invalid \"max\" value")]
    InvalidMax(String),

    #[error("Field \"{0}\" has invalid \"pattern\" value")]
    InvalidPattern(String),

    #[error("Field at position {0} must have a \"name\" property")]
    MissingName(usize),

    #[error("Field \"{0}\" is defined more than once")]
    DuplicateName(String),
}

/// Returns `None` for a structurally valid schema, otherwise the first problem found.
pub fn validate_schema_definition(schema: &Value) -> Option<String> {
    let entries = match schema.as_object() {
        Some(entries) => entries,
        None => return Some(SchemaDefinitionError::NotAnObject.to_string()),
    };

    entries
        .iter()
        .find_map(|(key, config)| check_entry(key, config).err())
        .map(|err| err.to_string())
}

/// Checks a schema and converts it to its canonical form.
///
/// Accepts the authoring shape (an object keyed by field name) and the
/// stored shape (an array of definitions carrying a `name`).
pub fn parse_field_schema(schema: &Value) -> Result<FieldSchema, SchemaDefinitionError> {
    match schema {
        Value::Object(entries) => {
            let mut fields = Vec::with_capacity(entries.len());
            for (key, config) in entries {
                let kind = check_entry(key, config)?;
                fields.push(build_definition(key, config, kind));
            }
            Ok(FieldSchema::new(fields))
        }
        Value::Array(entries) => {
            let mut seen = HashSet::new();
            let mut fields = Vec::with_capacity(entries.len());
            for (position, config) in entries.iter().enumerate() {
                let name = match config.as_object() {
                    Some(obj) => obj
                        .get("name")
                        .and_then(Value::as_str)
                        .filter(|name| !name.trim().is_empty())
                        .ok_or(SchemaDefinitionError::MissingName(position))?,
                    None => {
                        return Err(SchemaDefinitionError::FieldNotObject(position.to_string()))
                    }
                };

                if !seen.insert(name) {
                    return Err(SchemaDefinitionError::DuplicateName(name.to_string()));
                }

                let kind = check_entry(name, config)?;
                fields.push(build_definition(name, config, kind));
            }
            Ok(FieldSchema::new(fields))
        }
        _ => Err(SchemaDefinitionError::NotAnObject),
    }
}

fn check_entry(key: &str, config: &Value) -> Result<FieldKind, SchemaDefinitionError> {
    let config = config
        .as_object()
        .ok_or_else(|| SchemaDefinitionError::FieldNotObject(key.to_string()))?;

    let field_type = config
        .get("type")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| SchemaDefinitionError::MissingType(key.to_string()))?;

    let canonical = FieldKind::canonical_type_name(field_type).ok_or_else(|| {
        SchemaDefinitionError::UnsupportedType {
            key: key.to_string(),
            field_type: field_type.to_string(),
        }
    })?;

    let kind = match canonical {
        "select" => {
            let options = config
                .get("options")
                .and_then(Value::as_array)
                .ok_or_else(|| SchemaDefinitionError::MissingOptions(key.to_string()))?;

            let options = options
                .iter()
                .map(|option| option.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| SchemaDefinitionError::NonStringOption(key.to_string()))?;

            FieldKind::Select { options }
        }
        "number" => {
            let min = numeric_bound(config, "min")
                .map_err(|_| SchemaDefinitionError::InvalidMin(key.to_string()))?;
            let max = numeric_bound(config, "max")
                .map_err(|_| SchemaDefinitionError::InvalidMax(key.to_string()))?;
            FieldKind::Number { min, max }
        }
        "text" => {
            let pattern = match constraint(config, "pattern") {
                None => None,
                Some(Value::String(pattern)) if Regex::new(pattern).is_ok() => Some(pattern.clone()),
                Some(_) => return Err(SchemaDefinitionError::InvalidPattern(key.to_string())),
            };
            FieldKind::Text { pattern }
        }
        "boolean" => FieldKind::Boolean,
        "date" => FieldKind::Date,
        "url" => FieldKind::Url,
        "textarea" => FieldKind::Textarea,
        other => FieldKind::Other(other.to_string()),
    };

    Ok(kind)
}

/// Constraints may sit on the entry itself (authoring shape) or under
/// `validation` (stored shape). A `null` counts as not set.
fn constraint<'a>(config: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    config
        .get(name)
        .or_else(|| config.get("validation").and_then(|v| v.get(name)))
        .filter(|value| !value.is_null())
}

fn numeric_bound(config: &Map<String, Value>, name: &str) -> Result<Option<f64>, ()> {
    match constraint(config, name) {
        None => Ok(None),
        Some(value) => value.as_f64().map(Some).ok_or(()),
    }
}

fn build_definition(key: &str, config: &Value, kind: FieldKind) -> FieldDefinition {
    let text = |name: &str| config.get(name).and_then(Value::as_str).map(str::to_string);

    FieldDefinition {
        name: key.to_string(),
        label: text("label").unwrap_or_else(|| key.to_string()),
        required: config.get("required").and_then(Value::as_bool).unwrap_or(false),
        kind,
        description: text("description"),
        placeholder: text("placeholder"),
    }
}

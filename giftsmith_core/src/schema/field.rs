//! Field definitions attached to a product type.
//!
//! The stored JSON shape keeps the constraint bag of the admin UI
//! (`options`, `validation.min`, ...). In memory each field kind carries
//! only the constraints that apply to it; conversion goes through
//! [`RawFieldDefinition`].

use serde::{Deserialize, Serialize};

use super::definition::SchemaDefinitionError;

/// Canonical field kinds, in the order they are listed to users.
pub const SUPPORTED_FIELD_TYPES: [&str; 7] =
    ["text", "number", "boolean", "select", "date", "url", "textarea"];

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text { pattern: Option<String> },
    Number { min: Option<f64>, max: Option<f64> },
    Boolean,
    Select { options: Vec<String> },
    Date,
    Url,
    Textarea,
    /// A kind this build does not know about. Only presence is checked.
    Other(String),
}

impl FieldKind {
    pub fn type_name(&self) -> &str {
        match self {
            FieldKind::Text { .. } => "text",
            FieldKind::Number { .. } => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Select { .. } => "select",
            FieldKind::Date => "date",
            FieldKind::Url => "url",
            FieldKind::Textarea => "textarea",
            FieldKind::Other(name) => name,
        }
    }

    /// Maps a type name onto its canonical spelling. `string` is the name the
    /// first admin screens used for `text`.
    pub fn canonical_type_name(type_name: &str) -> Option<&'static str> {
        match type_name {
            "string" => Some("text"),
            other => SUPPORTED_FIELD_TYPES.iter().copied().find(|t| *t == other),
        }
    }

    pub fn is_supported(type_name: &str) -> bool {
        Self::canonical_type_name(type_name).is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFieldDefinition", into = "RawFieldDefinition")]
pub struct FieldDefinition {
    pub name: String,
    pub label: String,
    pub required: bool,
    pub kind: FieldKind,
    pub description: Option<String>,
    pub placeholder: Option<String>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            required: false,
            kind,
            description: None,
            placeholder: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Ordered list of field definitions. Order is the order errors are reported in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSchema(Vec<FieldDefinition>);

impl FieldSchema {
    pub fn new(fields: Vec<FieldDefinition>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.0
    }

    pub fn get(&self, name: &str) -> Option<&FieldDefinition> {
        self.0.iter().find(|field| field.name == name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldDefinition> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a FieldSchema {
    type Item = &'a FieldDefinition;
    type IntoIter = std::slice::Iter<'a, FieldDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Vec<FieldDefinition>> for FieldSchema {
    fn from(fields: Vec<FieldDefinition>) -> Self {
        Self(fields)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawValidation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl RawValidation {
    fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none() && self.pattern.is_none()
    }
}

/// Storage shape of a single field definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFieldDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<RawValidation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl TryFrom<RawFieldDefinition> for FieldDefinition {
    type Error = SchemaDefinitionError;

    fn try_from(raw: RawFieldDefinition) -> Result<Self, Self::Error> {
        let validation = raw.validation.unwrap_or_default();

        let kind = match FieldKind::canonical_type_name(&raw.field_type) {
            Some("text") => FieldKind::Text { pattern: validation.pattern },
            Some("number") => FieldKind::Number {
                min: validation.min,
                max: validation.max,
            },
            Some("boolean") => FieldKind::Boolean,
            Some("select") => FieldKind::Select {
                options: raw
                    .options
                    .ok_or_else(|| SchemaDefinitionError::MissingOptions(raw.name.clone()))?,
            },
            Some("date") => FieldKind::Date,
            Some("url") => FieldKind::Url,
            Some("textarea") => FieldKind::Textarea,
            _ => FieldKind::Other(raw.field_type),
        };

        Ok(Self {
            label: raw.label.unwrap_or_else(|| raw.name.clone()),
            name: raw.name,
            required: raw.required,
            kind,
            description: raw.description,
            placeholder: raw.placeholder,
        })
    }
}

impl From<FieldDefinition> for RawFieldDefinition {
    fn from(field: FieldDefinition) -> Self {
        let field_type = field.kind.type_name().to_string();
        let mut options = None;
        let mut validation = RawValidation::default();

        match field.kind {
            FieldKind::Text { pattern } => validation.pattern = pattern,
            FieldKind::Number { min, max } => {
                validation.min = min;
                validation.max = max;
            }
            FieldKind::Select { options: values } => options = Some(values),
            _ => {}
        }

        Self {
            name: field.name,
            field_type,
            label: Some(field.label),
            required: field.required,
            options,
            validation: (!validation.is_empty()).then_some(validation),
            description: field.description,
            placeholder: field.placeholder,
        }
    }
}

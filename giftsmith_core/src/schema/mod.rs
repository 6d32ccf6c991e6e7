//! Field schemas describing the custom attributes a product type accepts

pub mod definition;
pub mod field;

pub use definition::{parse_field_schema, validate_schema_definition, SchemaDefinitionError};
pub use field::{
    FieldDefinition, FieldKind, FieldSchema, RawFieldDefinition, RawValidation, SUPPORTED_FIELD_TYPES,
};

/// Custom attribute values of one product, keyed by field name.
pub type CustomAttributes = serde_json::Map<String, serde_json::Value>;

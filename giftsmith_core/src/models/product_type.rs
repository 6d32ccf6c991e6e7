//! Product types: named attribute schemas that custom products conform to.

use crate::schema::FieldSchema;
use crate::validation::rules::validate_slug;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductType {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub field_schema: FieldSchema,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `field_schema` stays untyped here: it is checked by the schema definition
/// validator, which reports problems the way admins author them.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProductTypeRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,

    #[validate(custom(function = "validate_slug"))]
    pub slug: String,

    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    pub description: Option<String>,

    #[serde(default = "empty_schema")]
    pub field_schema: serde_json::Value,

    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProductTypeRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: Option<String>,

    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,

    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    pub description: Option<String>,

    pub field_schema: Option<serde_json::Value>,

    pub is_active: Option<bool>,
}

fn empty_schema() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validatable;
    use serde_json::json;

    #[test]
    fn test_create_request_defaults() {
        let request: CreateProductTypeRequest =
            serde_json::from_value(json!({"name": "Gift Box", "slug": "gift-box"})).unwrap();
        assert_eq!(request.field_schema, json!({}));
        assert!(request.is_active.is_none());
        assert!(request.validate_request().is_ok());
    }

    #[test]
    fn test_create_request_rejects_bad_slug_and_name() {
        let request = CreateProductTypeRequest {
            name: String::new(),
            slug: "Gift Box".to_string(),
            description: None,
            field_schema: json!({}),
            is_active: None,
        };
        let err = request.validate_request().unwrap_err();
        match err {
            crate::error::AppError::Validation(details) => {
                assert_eq!(details.len(), 2);
                assert_eq!(details[0], "Name must be between 1 and 255 characters");
                assert!(details[1].starts_with("slug: "));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_update_request_allows_partial() {
        let request: UpdateProductTypeRequest =
            serde_json::from_value(json!({"is_active": false})).unwrap();
        assert!(request.validate_request().is_ok());
        assert_eq!(request.is_active, Some(false));
        assert!(request.field_schema.is_none());
    }
}

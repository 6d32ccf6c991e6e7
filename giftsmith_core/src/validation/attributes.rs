//! Checks custom attribute values against a product type's field schema.

use regex::Regex;
use serde_json::Value;

use super::rules::is_valid_date;
use crate::schema::{CustomAttributes, FieldDefinition, FieldKind, FieldSchema};

/// Validates `attributes` against `schema` and returns every violation found,
/// in schema order. An empty list means the attributes are valid.
///
/// A field whose value is absent or falsy (`null`, `false`, `0`, `""`)
/// counts as not provided: it fails only when the field is required, and
/// gets no further checks. Attribute keys the schema does not mention are
/// ignored.
pub fn validate_attributes(schema: &FieldSchema, attributes: &CustomAttributes) -> Vec<String> {
    let mut errors = Vec::new();

    for field in schema {
        match attributes.get(&field.name).filter(|value| !is_blank(value)) {
            None if field.required => {
                errors.push(format!("Field '{}' is required", field.label));
            }
            None => {}
            Some(value) => check_value(field, value, &mut errors),
        }
    }

    errors
}

/// Falsy attribute values. A required boolean must be `true` and a required
/// number must be non-zero.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map_or(false, |n| n == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn check_value(field: &FieldDefinition, value: &Value, errors: &mut Vec<String>) {
    let label = &field.label;

    match &field.kind {
        FieldKind::Text { pattern } => match value.as_str() {
            None => errors.push(format!("Field '{}' must be a string", label)),
            Some(text) => {
                if let Some(pattern) = pattern {
                    match Regex::new(pattern) {
                        Ok(regex) if !regex.is_match(text) => errors.push(format!(
                            "Field '{}' does not match the required pattern",
                            label
                        )),
                        Ok(_) => {}
                        Err(_) => errors.push(format!(
                            "Field '{}' has an invalid validation pattern",
                            label
                        )),
                    }
                }
            }
        },
        FieldKind::Url | FieldKind::Textarea => {
            if !value.is_string() {
                errors.push(format!("Field '{}' must be a string", label));
            }
        }
        FieldKind::Number { min, max } => match value.as_f64() {
            None => errors.push(format!("Field '{}' must be a number", label)),
            Some(number) => {
                if let Some(min) = min {
                    if number < *min {
                        errors.push(format!("Field '{}' must be at least {}", label, min));
                    }
                }
                if let Some(max) = max {
                    if number > *max {
                        errors.push(format!("Field '{}' must be at most {}", label, max));
                    }
                }
            }
        },
        FieldKind::Boolean => {
            if !value.is_boolean() {
                errors.push(format!("Field '{}' must be a boolean", label));
            }
        }
        FieldKind::Select { options } => match value.as_str() {
            None => errors.push(format!("Field '{}' must be a string", label)),
            Some(choice) if !options.iter().any(|option| option == choice) => {
                errors.push(format!(
                    "Field '{}' must be one of: {}",
                    label,
                    options.join(", ")
                ));
            }
            Some(_) => {}
        },
        FieldKind::Date => {
            if !value.as_str().is_some_and(is_valid_date) {
                errors.push(format!("Field '{}' must be a valid date", label));
            }
        }
        FieldKind::Other(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(value: Value) -> CustomAttributes {
        value.as_object().cloned().unwrap()
    }

    fn box_size_schema() -> FieldSchema {
        FieldSchema::new(vec![FieldDefinition::new(
            "box_size",
            "Box Size",
            FieldKind::Select {
                options: vec!["small".into(), "medium".into(), "large".into()],
            },
        )
        .required()])
    }

    fn max_items_schema() -> FieldSchema {
        FieldSchema::new(vec![FieldDefinition::new(
            "max_items",
            "Max Items",
            FieldKind::Number { min: Some(1.0), max: Some(20.0) },
        )
        .required()])
    }

    #[test]
    fn test_select_outside_options() {
        let errors = validate_attributes(&box_size_schema(), &attrs(json!({"box_size": "giant"})));
        assert_eq!(errors, vec!["Field 'Box Size' must be one of: small, medium, large"]);
    }

    #[test]
    fn test_number_bounds() {
        let schema = max_items_schema();
        assert_eq!(
            validate_attributes(&schema, &attrs(json!({"max_items": 25}))),
            vec!["Field 'Max Items' must be at most 20"]
        );
        assert_eq!(
            validate_attributes(&schema, &attrs(json!({"max_items": -3}))),
            vec!["Field 'Max Items' must be at least 1"]
        );
        assert!(validate_attributes(&schema, &attrs(json!({"max_items": 10}))).is_empty());
        assert!(validate_attributes(&schema, &attrs(json!({"max_items": 20}))).is_empty());
        assert!(validate_attributes(&schema, &attrs(json!({"max_items": 1}))).is_empty());
    }

    #[test]
    fn test_crossed_bounds_report_both() {
        let schema = FieldSchema::new(vec![FieldDefinition::new(
            "weight",
            "Weight",
            FieldKind::Number { min: Some(10.0), max: Some(5.0) },
        )]);
        assert_eq!(
            validate_attributes(&schema, &attrs(json!({"weight": 7}))),
            vec!["Field 'Weight' must be at least 10", "Field 'Weight' must be at most 5"]
        );
    }

    #[test]
    fn test_zero_bound_is_enforced() {
        let schema = FieldSchema::new(vec![FieldDefinition::new(
            "stock",
            "Stock",
            FieldKind::Number { min: Some(0.0), max: None },
        )]);
        assert_eq!(
            validate_attributes(&schema, &attrs(json!({"stock": -1}))),
            vec!["Field 'Stock' must be at least 0"]
        );
    }

    #[test]
    fn test_required_and_blank_values() {
        let schema = box_size_schema();
        let expected = vec!["Field 'Box Size' is required"];

        assert_eq!(validate_attributes(&schema, &attrs(json!({}))), expected);
        assert_eq!(validate_attributes(&schema, &attrs(json!({"box_size": null}))), expected);
        assert_eq!(validate_attributes(&schema, &attrs(json!({"box_size": ""}))), expected);
    }

    #[test]
    fn test_optional_blank_is_skipped() {
        let schema = FieldSchema::new(vec![FieldDefinition::new(
            "max_items",
            "Max Items",
            FieldKind::Number { min: Some(1.0), max: None },
        )]);
        assert!(validate_attributes(&schema, &attrs(json!({}))).is_empty());
        assert!(validate_attributes(&schema, &attrs(json!({"max_items": ""}))).is_empty());
    }

    #[test]
    fn test_false_and_zero_count_as_missing() {
        let schema = FieldSchema::new(vec![
            FieldDefinition::new("gift_wrap", "Gift Wrap", FieldKind::Boolean).required(),
            FieldDefinition::new("qty", "Qty", FieldKind::Number { min: None, max: None }).required(),
        ]);
        assert_eq!(
            validate_attributes(&schema, &attrs(json!({"gift_wrap": false, "qty": 0}))),
            vec!["Field 'Gift Wrap' is required", "Field 'Qty' is required"]
        );
        assert_eq!(
            validate_attributes(&schema, &attrs(json!({"gift_wrap": false, "qty": 0.0}))).len(),
            2
        );
        assert!(validate_attributes(&schema, &attrs(json!({"gift_wrap": true, "qty": 3}))).is_empty());
    }

    #[test]
    fn test_optional_falsy_values_skip_checks() {
        let schema = FieldSchema::new(vec![
            FieldDefinition::new("gift_wrap", "Gift Wrap", FieldKind::Boolean),
            FieldDefinition::new("qty", "Qty", FieldKind::Number { min: Some(1.0), max: None }),
        ]);
        assert!(validate_attributes(&schema, &attrs(json!({"gift_wrap": false, "qty": 0}))).is_empty());
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(&json!(null)));
        assert!(is_blank(&json!(false)));
        assert!(is_blank(&json!(0)));
        assert!(is_blank(&json!("")));
        assert!(!is_blank(&json!(true)));
        assert!(!is_blank(&json!(-1)));
        assert!(!is_blank(&json!(" ")));
        assert!(!is_blank(&json!([])));
        assert!(!is_blank(&json!({})));
    }

    #[test]
    fn test_type_mismatches() {
        let schema = FieldSchema::new(vec![
            FieldDefinition::new("title", "Title", FieldKind::Text { pattern: None }),
            FieldDefinition::new("site", "Site", FieldKind::Url),
            FieldDefinition::new("notes", "Notes", FieldKind::Textarea),
            FieldDefinition::new("count", "Count", FieldKind::Number { min: None, max: None }),
            FieldDefinition::new("wrap", "Wrap", FieldKind::Boolean),
            FieldDefinition::new("size", "Size", FieldKind::Select { options: vec!["s".into()] }),
            FieldDefinition::new("ships", "Ships", FieldKind::Date),
        ]);

        let errors = validate_attributes(
            &schema,
            &attrs(json!({
                "title": 5,
                "site": true,
                "notes": ["a"],
                "count": "12",
                "wrap": "yes",
                "size": 1,
                "ships": 20250621
            })),
        );

        assert_eq!(
            errors,
            vec![
                "Field 'Title' must be a string",
                "Field 'Site' must be a string",
                "Field 'Notes' must be a string",
                "Field 'Count' must be a number",
                "Field 'Wrap' must be a boolean",
                "Field 'Size' must be a string",
                "Field 'Ships' must be a valid date",
            ]
        );
    }

    #[test]
    fn test_text_pattern() {
        let schema = FieldSchema::new(vec![FieldDefinition::new(
            "sku",
            "SKU",
            FieldKind::Text { pattern: Some("^[A-Z]{3}-\\d+$".into()) },
        )]);

        assert!(validate_attributes(&schema, &attrs(json!({"sku": "ABC-12"}))).is_empty());
        assert_eq!(
            validate_attributes(&schema, &attrs(json!({"sku": "abc"}))),
            vec!["Field 'SKU' does not match the required pattern"]
        );
    }

    #[test]
    fn test_broken_pattern_is_reported_not_raised() {
        let schema = FieldSchema::new(vec![FieldDefinition::new(
            "sku",
            "SKU",
            FieldKind::Text { pattern: Some("([A-Z".into()) },
        )]);
        assert_eq!(
            validate_attributes(&schema, &attrs(json!({"sku": "ABC"}))),
            vec!["Field 'SKU' has an invalid validation pattern"]
        );
    }

    #[test]
    fn test_dates() {
        let schema = FieldSchema::new(vec![FieldDefinition::new("ships", "Ships", FieldKind::Date)]);
        assert!(validate_attributes(&schema, &attrs(json!({"ships": "2025-12-24"}))).is_empty());
        assert!(validate_attributes(&schema, &attrs(json!({"ships": "2025-12-24T08:00:00Z"}))).is_empty());
        assert_eq!(
            validate_attributes(&schema, &attrs(json!({"ships": "soon"}))),
            vec!["Field 'Ships' must be a valid date"]
        );
    }

    #[test]
    fn test_unknown_kind_checks_presence_only() {
        let schema = FieldSchema::new(vec![FieldDefinition::new(
            "extra",
            "Extra",
            FieldKind::Other("json".into()),
        )
        .required()]);

        assert!(validate_attributes(&schema, &attrs(json!({"extra": {"a": 1}}))).is_empty());
        assert_eq!(
            validate_attributes(&schema, &attrs(json!({}))),
            vec!["Field 'Extra' is required"]
        );
    }

    #[test]
    fn test_errors_follow_schema_order_and_ignore_extra_keys() {
        let schema = FieldSchema::new(vec![
            FieldDefinition::new("b", "B", FieldKind::Boolean).required(),
            FieldDefinition::new("a", "A", FieldKind::Url).required(),
        ]);
        let errors = validate_attributes(&schema, &attrs(json!({"unrelated": 1})));
        assert_eq!(errors, vec!["Field 'B' is required", "Field 'A' is required"]);
    }

    #[test]
    fn test_inputs_are_left_untouched() {
        let schema = max_items_schema();
        let attributes = attrs(json!({"max_items": 25}));
        let first = validate_attributes(&schema, &attributes);
        let second = validate_attributes(&schema, &attributes);
        assert_eq!(first, second);
        assert_eq!(attributes, attrs(json!({"max_items": 25})));
        assert_eq!(schema, max_items_schema());
    }
}

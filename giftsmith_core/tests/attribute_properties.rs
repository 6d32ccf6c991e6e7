use giftsmith_core::{
    schema::{CustomAttributes, FieldDefinition, FieldKind, FieldSchema},
    validation::validate_attributes,
};
use proptest::prelude::*;
use serde_json::{json, Value};

fn field_kind() -> impl Strategy<Value = FieldKind> {
    prop_oneof![
        prop_oneof![
            Just(None),
            Just(Some("^[a-z]+$".to_string())),
            Just(Some("([a-z".to_string())),
        ]
        .prop_map(|pattern| FieldKind::Text { pattern }),
        (proptest::option::of(-50i32..50), proptest::option::of(-50i32..50)).prop_map(|(min, max)| {
            FieldKind::Number {
                min: min.map(f64::from),
                max: max.map(f64::from),
            }
        }),
        Just(FieldKind::Boolean),
        Just(FieldKind::Select {
            options: vec!["red".into(), "green".into(), "blue".into()],
        }),
        Just(FieldKind::Date),
        prop_oneof![
            Just(FieldKind::Textarea),
            Just(FieldKind::Url),
            Just(FieldKind::Other("json".into())),
        ],
    ]
}

fn attribute_value() -> impl Strategy<Value = Option<Value>> {
    proptest::option::of(prop_oneof![
        Just(Value::Null),
        prop_oneof![
            Just(""),
            Just("red"),
            Just("purple"),
            Just("Red"),
            Just("https://gifts.example/box"),
            Just("2025-06-21"),
            Just("2025-13-40"),
        ]
        .prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        (-100i32..100).prop_map(Value::from),
        prop_oneof![Just(0.0), Just(2.5)].prop_map(Value::from),
        Just(json!(["red"])),
        Just(json!({"nested": "red"})),
    ])
}

fn schema_and_attributes() -> impl Strategy<Value = (FieldSchema, CustomAttributes)> {
    proptest::collection::vec((field_kind(), any::<bool>(), attribute_value()), 0..6).prop_map(|entries| {
        let mut fields = Vec::new();
        let mut attributes = CustomAttributes::new();

        for (index, (kind, required, value)) in entries.into_iter().enumerate() {
            let name = format!("field_{}", index);
            let mut field = FieldDefinition::new(name.clone(), format!("Field {}", index), kind);
            field.required = required;
            fields.push(field);

            if let Some(value) = value {
                attributes.insert(name, value);
            }
        }

        attributes.insert("unlisted".into(), json!({"ignored": true}));
        (FieldSchema::new(fields), attributes)
    })
}

fn is_calendar_date(text: &str) -> bool {
    chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !*b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn matches_pattern(pattern: &str, text: &str) -> bool {
    regex::Regex::new(pattern).map_or(false, |regex| regex.is_match(text))
}

/// Restates the acceptance rules field by field.
fn field_accepts(field: &FieldDefinition, value: Option<&Value>) -> bool {
    let value = match value {
        None => return !field.required,
        Some(value) if is_falsy(value) => return !field.required,
        Some(value) => value,
    };

    match &field.kind {
        FieldKind::Text { pattern: Some(pattern) } => {
            value.as_str().is_some_and(|text| matches_pattern(pattern, text))
        }
        FieldKind::Text { pattern: None } | FieldKind::Textarea | FieldKind::Url => value.is_string(),
        FieldKind::Number { min, max } => match value.as_f64() {
            Some(n) => min.map_or(true, |min| n >= min) && max.map_or(true, |max| n <= max),
            None => false,
        },
        FieldKind::Boolean => value.is_boolean(),
        FieldKind::Select { options } => value
            .as_str()
            .is_some_and(|choice| options.iter().any(|option| option == choice)),
        FieldKind::Date => value.as_str().is_some_and(is_calendar_date),
        FieldKind::Other(_) => true,
    }
}

proptest! {
    #[test]
    fn attributes_valid_exactly_when_every_field_accepts((schema, attributes) in schema_and_attributes()) {
        let expected = schema
            .iter()
            .all(|field| field_accepts(field, attributes.get(&field.name)));

        let errors = validate_attributes(&schema, &attributes);
        prop_assert_eq!(errors.is_empty(), expected, "errors: {:?}", errors);
    }

    #[test]
    fn validation_is_deterministic((schema, attributes) in schema_and_attributes()) {
        let first = validate_attributes(&schema, &attributes);
        let second = validate_attributes(&schema, &attributes);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn missing_required_fields_are_each_reported((schema, _attributes) in schema_and_attributes()) {
        let errors = validate_attributes(&schema, &CustomAttributes::new());
        let required = schema.iter().filter(|field| field.required).count();
        prop_assert_eq!(errors.len(), required);
    }
}

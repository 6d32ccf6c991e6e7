//! Input validation: request payload rules and custom attribute checks

pub mod attributes;
pub mod rules;

pub use attributes::{is_blank, validate_attributes};
pub use rules::*;

use crate::error::{AppError, Result};
use validator::{Validate, ValidationErrors};

/// Flattens `validator` errors into display messages, ordered by field name.
pub fn collect_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<(String, Vec<String>)> = errors
        .field_errors()
        .into_iter()
        .map(|(field, field_errors)| {
            let field = field.to_string();
            let messages = field_errors
                .iter()
                .map(|error| match &error.message {
                    Some(message) => message.to_string(),
                    None => format!("{}: {}", field, error.code),
                })
                .collect();
            (field, messages)
        })
        .collect();

    fields.sort_by(|a, b| a.0.cmp(&b.0));
    fields.into_iter().flat_map(|(_, messages)| messages).collect()
}

pub trait Validatable {
    fn validate_request(&self) -> Result<()>;
}

impl<T> Validatable for T
where
    T: Validate,
{
    fn validate_request(&self) -> Result<()> {
        self.validate()
            .map_err(|errors| AppError::Validation(collect_messages(&errors)))
    }
}

//! Validation rules and custom validators

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    static ref SLUG_REGEX: Regex = Regex::new(
        r"^[a-z0-9]+(?:-[a-z0-9]+)*$"
    ).unwrap();

    static ref URL_REGEX: Regex = Regex::new(
        r"^https?://[^\s/$.?#].[^\s]*$"
    ).unwrap();

    static ref TXN_REF_REGEX: Regex = Regex::new(
        r"^[A-Za-z0-9_-]{1,100}$"
    ).unwrap();

    static ref CURRENCY_REGEX: Regex = Regex::new(
        r"^[A-Z]{3}$"
    ).unwrap();
}

const SUPPORTED_LOCALES: [&str; 2] = ["vn", "en"];

const NAIVE_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.is_empty() {
        return Err(ValidationError::new("Slug cannot be empty"));
    }

    if slug.len() > 100 {
        return Err(ValidationError::new("Slug is too long"));
    }

    if !SLUG_REGEX.is_match(slug) {
        return Err(ValidationError::new(
            "Slug must contain only lowercase letters, numbers, and hyphens"
        ));
    }

    Ok(())
}

pub fn validate_url(url: &str) -> Result<(), ValidationError> {
    if url.is_empty() {
        return Err(ValidationError::new("URL cannot be empty"));
    }

    if url.len() > 2048 {
        return Err(ValidationError::new("URL is too long"));
    }

    if !URL_REGEX.is_match(url) {
        return Err(ValidationError::new("Invalid URL format"));
    }

    Ok(())
}

/// Transaction references are echoed back by the gateway, keep them to a safe alphabet.
pub fn validate_txn_ref(txn_ref: &str) -> Result<(), ValidationError> {
    if !TXN_REF_REGEX.is_match(txn_ref) {
        return Err(ValidationError::new(
            "Order ID must be 1-100 characters of letters, numbers, hyphens, and underscores"
        ));
    }

    Ok(())
}

pub fn validate_locale(locale: &str) -> Result<(), ValidationError> {
    if !SUPPORTED_LOCALES.contains(&locale) {
        return Err(ValidationError::new("Locale must be one of: vn, en"));
    }

    Ok(())
}

pub fn validate_currency_code(code: &str) -> Result<(), ValidationError> {
    if !CURRENCY_REGEX.is_match(code) {
        return Err(ValidationError::new("Currency must be a three-letter ISO code"));
    }

    Ok(())
}

/// Accepts RFC 3339, RFC 2822 and the plain calendar formats admins type in.
pub fn is_valid_date(input: &str) -> bool {
    let input = input.trim();
    if input.is_empty() {
        return false;
    }

    DateTime::parse_from_rfc3339(input).is_ok()
        || DateTime::parse_from_rfc2822(input).is_ok()
        || NAIVE_DATE_FORMATS
            .iter()
            .any(|format| NaiveDate::parse_from_str(input, format).is_ok())
        || NAIVE_DATETIME_FORMATS
            .iter()
            .any(|format| NaiveDateTime::parse_from_str(input, format).is_ok())
}

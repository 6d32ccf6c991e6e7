use super::product_type::ProductType;
use crate::schema::CustomAttributes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Custom attribute values attached to one catalogue product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomProduct {
    pub id: String,
    pub product_id: String,
    pub product_type_id: String,
    pub custom_attributes: CustomAttributes,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCustomProductRequest {
    #[validate(length(min = 1, max = 255, message = "Product ID is required"))]
    pub product_id: String,

    #[validate(length(min = 1, max = 255, message = "Product type ID is required"))]
    pub product_type_id: String,

    #[serde(default)]
    pub custom_attributes: CustomAttributes,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateCustomProductRequest {
    #[validate(length(min = 1, max = 255, message = "Product type ID cannot be empty"))]
    pub product_type_id: Option<String>,

    pub custom_attributes: Option<CustomAttributes>,
}

/// Body of the per-product custom data upsert.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CustomDataRequest {
    #[validate(length(min = 1, max = 255, message = "Product type ID is required"))]
    pub product_type_id: String,

    #[serde(default)]
    pub custom_attributes: CustomAttributes,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomDataView {
    pub product_id: String,
    pub custom_product: Option<CustomProduct>,
    pub product_type: Option<ProductType>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminCustomProductQuery {
    pub product_type_id: Option<String>,
}

pub const DEFAULT_STORE_LIMIT: i64 = 12;
pub const MAX_STORE_LIMIT: i64 = 100;

/// Storefront listing filters. `custom_value` only applies together with
/// `custom_attribute`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreCustomProductQuery {
    pub product_type_id: Option<String>,
    pub custom_attribute: Option<String>,
    pub custom_value: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl StoreCustomProductQuery {
    pub fn limit(&self) -> i64 {
        self.limit
            .filter(|limit| *limit > 0)
            .map(|limit| limit.min(MAX_STORE_LIMIT))
            .unwrap_or(DEFAULT_STORE_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.filter(|offset| *offset >= 0).unwrap_or(0)
    }

    /// The attribute filter, when both a key and a value were given.
    pub fn attribute_filter(&self) -> Option<(&str, &str)> {
        match (&self.custom_attribute, &self.custom_value) {
            (Some(key), Some(value)) if !key.is_empty() => Some((key.as_str(), value.as_str())),
            _ => None,
        }
    }
}

/// A custom product as the storefront lists it, with its product type inlined.
#[derive(Debug, Clone, Serialize)]
pub struct StoreCustomProduct {
    #[serde(flatten)]
    pub product: CustomProduct,
    pub product_type: Option<ProductType>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoreCustomProductPage {
    pub products: Vec<StoreCustomProduct>,
    pub count: usize,
    pub limit: i64,
    pub offset: i64,
}

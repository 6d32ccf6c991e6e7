//! Row shapes as stored in SQLite. JSON columns and decimals are kept as
//! text and converted at the repository boundary.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::str::FromStr;

use crate::error::{AppError, Result};
use crate::models::{CustomProduct, Order, OrderStatus, ProductType};

#[derive(Debug, Clone)]
pub struct DbProductType {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub field_schema: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbProductType {
    pub fn from_row(row: &SqliteRow) -> Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
            description: row.try_get("description")?,
            field_schema: row.try_get("field_schema")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    pub fn into_product_type(self) -> Result<ProductType> {
        Ok(ProductType {
            field_schema: serde_json::from_str(&self.field_schema)?,
            id: self.id,
            name: self.name,
            slug: self.slug,
            description: self.description,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct DbCustomProduct {
    pub id: String,
    pub product_id: String,
    pub product_type_id: String,
    pub custom_attributes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbCustomProduct {
    pub fn from_row(row: &SqliteRow) -> Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            product_id: row.try_get("product_id")?,
            product_type_id: row.try_get("product_type_id")?,
            custom_attributes: row.try_get("custom_attributes")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    pub fn into_custom_product(self) -> Result<CustomProduct> {
        Ok(CustomProduct {
            custom_attributes: serde_json::from_str(&self.custom_attributes)?,
            id: self.id,
            product_id: self.product_id,
            product_type_id: self.product_type_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct DbOrder {
    pub id: String,
    pub total: String,
    pub currency_code: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbOrder {
    pub fn from_row(row: &SqliteRow) -> Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            total: row.try_get("total")?,
            currency_code: row.try_get("currency_code")?,
            status: row.try_get("status")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    pub fn into_order(self) -> Result<Order> {
        let total = Decimal::from_str(&self.total).map_err(|e| {
            AppError::Database(format!("Order {} has an invalid total: {}", self.id, e))
        })?;
        let status = OrderStatus::from_str(&self.status).map_err(AppError::Database)?;

        Ok(Order {
            id: self.id,
            total,
            currency_code: self.currency_code,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

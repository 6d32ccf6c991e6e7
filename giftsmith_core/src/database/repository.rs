use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::{DbCustomProduct, DbOrder, DbProductType};
use crate::error::{AppError, Result};
use crate::models::{CustomProduct, Order, OrderStatus, ProductType};
use crate::schema::{CustomAttributes, FieldSchema};

#[async_trait]
pub trait Repository<T> {
    type Id;
    type CreateInput;
    type UpdateInput;

    async fn create(&self, input: Self::CreateInput) -> Result<T>;
    async fn get_by_id(&self, id: Self::Id) -> Result<Option<T>>;
    async fn update(&self, id: Self::Id, input: Self::UpdateInput) -> Result<T>;
    async fn delete(&self, id: Self::Id) -> Result<()>;
    async fn list(&self, params: ListParams) -> Result<Vec<T>>;
    async fn count(&self) -> Result<i64>;
}

#[derive(Debug, Clone)]
pub struct ListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub sort_order: SortOrder,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            limit: None,
            offset: None,
            sort_order: SortOrder::Desc,
        }
    }
}

impl ListParams {
    fn limit(&self) -> i64 {
        // SQLite treats a negative LIMIT as "no limit".
        self.limit.unwrap_or(-1)
    }

    fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "ASC"),
            SortOrder::Desc => write!(f, "DESC"),
        }
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// Product types

const PRODUCT_TYPE_COLUMNS: &str =
    "id, name, slug, description, field_schema, is_active, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct NewProductType {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub field_schema: FieldSchema,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ProductTypeChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub field_schema: Option<FieldSchema>,
    pub is_active: Option<bool>,
}

#[derive(Clone)]
pub struct ProductTypeRepository {
    pool: SqlitePool,
}

impl ProductTypeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_active(&self) -> Result<Vec<ProductType>> {
        let query = format!(
            "SELECT {} FROM product_types WHERE is_active = 1 ORDER BY name ASC",
            PRODUCT_TYPE_COLUMNS
        );

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| DbProductType::from_row(row)?.into_product_type())
            .collect()
    }
}

#[async_trait]
impl Repository<ProductType> for ProductTypeRepository {
    type Id = String;
    type CreateInput = NewProductType;
    type UpdateInput = ProductTypeChanges;

    async fn create(&self, input: Self::CreateInput) -> Result<ProductType> {
        let now = Utc::now();
        let field_schema = serde_json::to_string(&input.field_schema)?;

        let query = format!(
            r#"
            INSERT INTO product_types (id, name, slug, description, field_schema, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {}
            "#,
            PRODUCT_TYPE_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(new_id())
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&field_schema)
            .bind(input.is_active)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        DbProductType::from_row(&row)?.into_product_type()
    }

    async fn get_by_id(&self, id: Self::Id) -> Result<Option<ProductType>> {
        let query = format!("SELECT {} FROM product_types WHERE id = ?", PRODUCT_TYPE_COLUMNS);

        let row = sqlx::query(&query)
            .bind(&id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| DbProductType::from_row(&row)?.into_product_type())
            .transpose()
    }

    async fn update(&self, id: Self::Id, input: Self::UpdateInput) -> Result<ProductType> {
        let current = self
            .get_by_id(id.clone())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Product type {} not found", id)))?;

        let field_schema = serde_json::to_string(input.field_schema.as_ref().unwrap_or(&current.field_schema))?;

        let query = format!(
            r#"
            UPDATE product_types
            SET name = ?, slug = ?, description = ?, field_schema = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            RETURNING {}
            "#,
            PRODUCT_TYPE_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(input.name.unwrap_or(current.name))
            .bind(input.slug.unwrap_or(current.slug))
            .bind(input.description.or(current.description))
            .bind(&field_schema)
            .bind(input.is_active.unwrap_or(current.is_active))
            .bind(Utc::now())
            .bind(&id)
            .fetch_one(&self.pool)
            .await?;

        DbProductType::from_row(&row)?.into_product_type()
    }

    async fn delete(&self, id: Self::Id) -> Result<()> {
        let result = sqlx::query("DELETE FROM product_types WHERE id = ?")
            .bind(&id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Product type {} not found", id)));
        }

        Ok(())
    }

    async fn list(&self, params: ListParams) -> Result<Vec<ProductType>> {
        let query = format!(
            "SELECT {} FROM product_types ORDER BY created_at {} LIMIT ? OFFSET ?",
            PRODUCT_TYPE_COLUMNS, params.sort_order
        );

        let rows = sqlx::query(&query)
            .bind(params.limit())
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list product types: {}", e);
                AppError::from(e)
            })?;

        rows.iter()
            .map(|row| DbProductType::from_row(row)?.into_product_type())
            .collect()
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product_types")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// Custom products

const CUSTOM_PRODUCT_COLUMNS: &str =
    "id, product_id, product_type_id, custom_attributes, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct NewCustomProduct {
    pub product_id: String,
    pub product_type_id: String,
    pub custom_attributes: CustomAttributes,
}

#[derive(Debug, Clone, Default)]
pub struct CustomProductChanges {
    pub product_type_id: Option<String>,
    pub custom_attributes: Option<CustomAttributes>,
}

#[derive(Clone)]
pub struct CustomProductRepository {
    pool: SqlitePool,
}

impl CustomProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_by_type(&self, product_type_id: &str) -> Result<Vec<CustomProduct>> {
        let query = format!(
            "SELECT {} FROM custom_products WHERE product_type_id = ? ORDER BY created_at DESC",
            CUSTOM_PRODUCT_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(product_type_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| DbCustomProduct::from_row(row)?.into_custom_product())
            .collect()
    }

    pub async fn get_by_product_id(&self, product_id: &str) -> Result<Option<CustomProduct>> {
        let query = format!(
            "SELECT {} FROM custom_products WHERE product_id = ?",
            CUSTOM_PRODUCT_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| DbCustomProduct::from_row(&row)?.into_custom_product())
            .transpose()
    }

    /// Creates or replaces the custom data of a catalogue product.
    pub async fn upsert_for_product(&self, input: NewCustomProduct) -> Result<CustomProduct> {
        let now = Utc::now();
        let custom_attributes = serde_json::to_string(&input.custom_attributes)?;

        let query = format!(
            r#"
            INSERT INTO custom_products (id, product_id, product_type_id, custom_attributes, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(product_id) DO UPDATE SET
                product_type_id = excluded.product_type_id,
                custom_attributes = excluded.custom_attributes,
                updated_at = excluded.updated_at
            RETURNING {}
            "#,
            CUSTOM_PRODUCT_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(new_id())
            .bind(&input.product_id)
            .bind(&input.product_type_id)
            .bind(&custom_attributes)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        DbCustomProduct::from_row(&row)?.into_custom_product()
    }
}

#[async_trait]
impl Repository<CustomProduct> for CustomProductRepository {
    type Id = String;
    type CreateInput = NewCustomProduct;
    type UpdateInput = CustomProductChanges;

    async fn create(&self, input: Self::CreateInput) -> Result<CustomProduct> {
        let now = Utc::now();
        let custom_attributes = serde_json::to_string(&input.custom_attributes)?;

        let query = format!(
            r#"
            INSERT INTO custom_products (id, product_id, product_type_id, custom_attributes, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING {}
            "#,
            CUSTOM_PRODUCT_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(new_id())
            .bind(&input.product_id)
            .bind(&input.product_type_id)
            .bind(&custom_attributes)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        DbCustomProduct::from_row(&row)?.into_custom_product()
    }

    async fn get_by_id(&self, id: Self::Id) -> Result<Option<CustomProduct>> {
        let query = format!("SELECT {} FROM custom_products WHERE id = ?", CUSTOM_PRODUCT_COLUMNS);

        let row = sqlx::query(&query)
            .bind(&id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| DbCustomProduct::from_row(&row)?.into_custom_product())
            .transpose()
    }

    async fn update(&self, id: Self::Id, input: Self::UpdateInput) -> Result<CustomProduct> {
        let current = self
            .get_by_id(id.clone())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Custom product {} not found", id)))?;

        let custom_attributes = serde_json::to_string(
            input.custom_attributes.as_ref().unwrap_or(&current.custom_attributes),
        )?;

        let query = format!(
            r#"
            UPDATE custom_products
            SET product_type_id = ?, custom_attributes = ?, updated_at = ?
            WHERE id = ?
            RETURNING {}
            "#,
            CUSTOM_PRODUCT_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(input.product_type_id.unwrap_or(current.product_type_id))
            .bind(&custom_attributes)
            .bind(Utc::now())
            .bind(&id)
            .fetch_one(&self.pool)
            .await?;

        DbCustomProduct::from_row(&row)?.into_custom_product()
    }

    async fn delete(&self, id: Self::Id) -> Result<()> {
        let result = sqlx::query("DELETE FROM custom_products WHERE id = ?")
            .bind(&id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Custom product {} not found", id)));
        }

        Ok(())
    }

    async fn list(&self, params: ListParams) -> Result<Vec<CustomProduct>> {
        let query = format!(
            "SELECT {} FROM custom_products ORDER BY created_at {} LIMIT ? OFFSET ?",
            CUSTOM_PRODUCT_COLUMNS, params.sort_order
        );

        let rows = sqlx::query(&query)
            .bind(params.limit())
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| DbCustomProduct::from_row(row)?.into_custom_product())
            .collect()
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM custom_products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// Orders

const ORDER_COLUMNS: &str = "id, total, currency_code, status, created_at, updated_at";

/// Orders are keyed by the merchant transaction reference sent to the gateway.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub id: String,
    pub total: Decimal,
    pub currency_code: String,
}

#[derive(Debug, Clone, Default)]
pub struct OrderChanges {
    pub status: Option<OrderStatus>,
}

#[derive(Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Flips a pending order to completed. Returns `false` when the order was
    /// already completed or does not exist, so concurrent callbacks settle it once.
    pub async fn mark_completed(&self, id: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE orders SET status = ?, updated_at = ? WHERE id = ? AND status != ?",
        )
        .bind(OrderStatus::Completed.to_string())
        .bind(Utc::now())
        .bind(id)
        .bind(OrderStatus::Completed.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl Repository<Order> for OrderRepository {
    type Id = String;
    type CreateInput = NewOrder;
    type UpdateInput = OrderChanges;

    async fn create(&self, input: Self::CreateInput) -> Result<Order> {
        let now = Utc::now();

        let query = format!(
            r#"
            INSERT INTO orders (id, total, currency_code, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING {}
            "#,
            ORDER_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(&input.id)
            .bind(input.total.normalize().to_string())
            .bind(&input.currency_code)
            .bind(OrderStatus::Pending.to_string())
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        DbOrder::from_row(&row)?.into_order()
    }

    async fn get_by_id(&self, id: Self::Id) -> Result<Option<Order>> {
        let query = format!("SELECT {} FROM orders WHERE id = ?", ORDER_COLUMNS);

        let row = sqlx::query(&query)
            .bind(&id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| DbOrder::from_row(&row)?.into_order()).transpose()
    }

    async fn update(&self, id: Self::Id, input: Self::UpdateInput) -> Result<Order> {
        let current = self
            .get_by_id(id.clone())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {} not found", id)))?;

        let query = format!(
            "UPDATE orders SET status = ?, updated_at = ? WHERE id = ? RETURNING {}",
            ORDER_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(input.status.unwrap_or(current.status).to_string())
            .bind(Utc::now())
            .bind(&id)
            .fetch_one(&self.pool)
            .await?;

        DbOrder::from_row(&row)?.into_order()
    }

    async fn delete(&self, id: Self::Id) -> Result<()> {
        let result = sqlx::query("DELETE FROM orders WHERE id = ?")
            .bind(&id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Order {} not found", id)));
        }

        Ok(())
    }

    async fn list(&self, params: ListParams) -> Result<Vec<Order>> {
        let query = format!(
            "SELECT {} FROM orders ORDER BY created_at {} LIMIT ? OFFSET ?",
            ORDER_COLUMNS, params.sort_order
        );

        let rows = sqlx::query(&query)
            .bind(params.limit())
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| DbOrder::from_row(row)?.into_order())
            .collect()
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

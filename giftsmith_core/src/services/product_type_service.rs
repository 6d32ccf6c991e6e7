use std::collections::HashMap;

use tracing::{debug, info};

use crate::{
    database::{
        CustomProductChanges, CustomProductRepository, ListParams, NewCustomProduct,
        NewProductType, ProductTypeChanges, ProductTypeRepository, Repository,
    },
    error::{AppError, Result},
    models::{
        CreateCustomProductRequest, CreateProductTypeRequest, CustomDataRequest, CustomDataView,
        CustomProduct, ProductType, StoreCustomProduct, StoreCustomProductPage,
        StoreCustomProductQuery, UpdateCustomProductRequest, UpdateProductTypeRequest,
    },
    schema::{parse_field_schema, CustomAttributes, FieldSchema},
    validation::{validate_attributes, Validatable},
};

/// Product types and the custom products that follow their schemas.
#[derive(Clone)]
pub struct ProductTypeService {
    product_types: ProductTypeRepository,
    custom_products: CustomProductRepository,
}

impl ProductTypeService {
    pub fn new(product_types: ProductTypeRepository, custom_products: CustomProductRepository) -> Self {
        Self {
            product_types,
            custom_products,
        }
    }

    pub async fn list_product_types(&self) -> Result<Vec<ProductType>> {
        self.product_types.list(ListParams::default()).await
    }

    pub async fn list_active_product_types(&self) -> Result<Vec<ProductType>> {
        self.product_types.list_active().await
    }

    pub async fn get_product_type(&self, id: &str) -> Result<ProductType> {
        self.product_types
            .get_by_id(id.to_string())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Product type {} not found", id)))
    }

    pub async fn create_product_type(&self, request: CreateProductTypeRequest) -> Result<ProductType> {
        request.validate_request()?;
        let field_schema = checked_schema(&request.field_schema)?;

        let product_type = self
            .product_types
            .create(NewProductType {
                name: request.name,
                slug: request.slug,
                description: request.description,
                field_schema,
                is_active: request.is_active.unwrap_or(true),
            })
            .await?;

        info!("Created product type {} ({})", product_type.slug, product_type.id);
        Ok(product_type)
    }

    pub async fn update_product_type(&self, id: &str, request: UpdateProductTypeRequest) -> Result<ProductType> {
        request.validate_request()?;
        let field_schema = request.field_schema.as_ref().map(checked_schema).transpose()?;

        self.product_types
            .update(
                id.to_string(),
                ProductTypeChanges {
                    name: request.name,
                    slug: request.slug,
                    description: request.description,
                    field_schema,
                    is_active: request.is_active,
                },
            )
            .await
    }

    pub async fn delete_product_type(&self, id: &str) -> Result<()> {
        self.product_types.delete(id.to_string()).await?;
        info!("Deleted product type {}", id);
        Ok(())
    }

    /// Checks `attributes` against the schema of the given product type and
    /// returns every violation. Fails only when the product type is unknown.
    pub async fn validate_custom_attributes(
        &self,
        product_type_id: &str,
        attributes: &CustomAttributes,
    ) -> Result<Vec<String>> {
        let product_type = self.get_product_type(product_type_id).await?;
        Ok(validate_attributes(&product_type.field_schema, attributes))
    }

    async fn ensure_valid_attributes(&self, product_type_id: &str, attributes: &CustomAttributes) -> Result<()> {
        let errors = self.validate_custom_attributes(product_type_id, attributes).await?;
        if errors.is_empty() {
            Ok(())
        } else {
            debug!("Rejected custom attributes for product type {}: {:?}", product_type_id, errors);
            Err(AppError::Validation(errors))
        }
    }

    pub async fn list_custom_products(&self, product_type_id: Option<&str>) -> Result<Vec<CustomProduct>> {
        match product_type_id {
            Some(product_type_id) => self.custom_products.list_by_type(product_type_id).await,
            None => self.custom_products.list(ListParams::default()).await,
        }
    }

    pub async fn get_custom_product(&self, id: &str) -> Result<CustomProduct> {
        self.custom_products
            .get_by_id(id.to_string())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Custom product {} not found", id)))
    }

    pub async fn create_custom_product(&self, request: CreateCustomProductRequest) -> Result<CustomProduct> {
        request.validate_request()?;
        self.ensure_valid_attributes(&request.product_type_id, &request.custom_attributes)
            .await?;

        self.custom_products
            .create(NewCustomProduct {
                product_id: request.product_id,
                product_type_id: request.product_type_id,
                custom_attributes: request.custom_attributes,
            })
            .await
    }

    /// Whenever the type or the attributes change, the resulting pair is
    /// validated, filling whichever side is absent from the stored record.
    pub async fn update_custom_product(&self, id: &str, request: UpdateCustomProductRequest) -> Result<CustomProduct> {
        request.validate_request()?;

        if request.product_type_id.is_some() || request.custom_attributes.is_some() {
            let current = self.get_custom_product(id).await?;
            let product_type_id = request
                .product_type_id
                .as_deref()
                .unwrap_or(&current.product_type_id);
            let attributes = request
                .custom_attributes
                .as_ref()
                .unwrap_or(&current.custom_attributes);

            self.ensure_valid_attributes(product_type_id, attributes).await?;
        }

        self.custom_products
            .update(
                id.to_string(),
                CustomProductChanges {
                    product_type_id: request.product_type_id,
                    custom_attributes: request.custom_attributes,
                },
            )
            .await
    }

    pub async fn delete_custom_product(&self, id: &str) -> Result<()> {
        self.custom_products.delete(id.to_string()).await
    }

    pub async fn get_custom_data(&self, product_id: &str) -> Result<CustomDataView> {
        let custom_product = self.custom_products.get_by_product_id(product_id).await?;

        let product_type = match &custom_product {
            Some(custom_product) => {
                self.product_types
                    .get_by_id(custom_product.product_type_id.clone())
                    .await?
            }
            None => None,
        };

        Ok(CustomDataView {
            product_id: product_id.to_string(),
            custom_product,
            product_type,
        })
    }

    /// Creates or replaces the custom data of a catalogue product. The flag is
    /// `true` when a new record was created.
    pub async fn save_custom_data(&self, product_id: &str, request: CustomDataRequest) -> Result<(CustomProduct, bool)> {
        request.validate_request()?;
        self.ensure_valid_attributes(&request.product_type_id, &request.custom_attributes)
            .await?;

        let existed = self.custom_products.get_by_product_id(product_id).await?.is_some();

        let custom_product = self
            .custom_products
            .upsert_for_product(NewCustomProduct {
                product_id: product_id.to_string(),
                product_type_id: request.product_type_id,
                custom_attributes: request.custom_attributes,
            })
            .await?;

        Ok((custom_product, !existed))
    }

    /// Storefront listing: filters, then counts, then paginates.
    pub async fn list_store_products(&self, query: &StoreCustomProductQuery) -> Result<StoreCustomProductPage> {
        let mut products = self
            .list_custom_products(query.product_type_id.as_deref())
            .await?;

        if let Some((key, value)) = query.attribute_filter() {
            products.retain(|product| {
                product
                    .custom_attributes
                    .get(key)
                    .and_then(|attribute| attribute.as_str())
                    == Some(value)
            });
        }

        let count = products.len();
        let limit = query.limit();
        let offset = query.offset();

        let page: Vec<CustomProduct> = products
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();

        let mut product_types: HashMap<String, Option<ProductType>> = HashMap::new();
        let mut listed = Vec::with_capacity(page.len());
        for product in page {
            if !product_types.contains_key(&product.product_type_id) {
                let product_type = self
                    .product_types
                    .get_by_id(product.product_type_id.clone())
                    .await?;
                product_types.insert(product.product_type_id.clone(), product_type);
            }

            let product_type = product_types
                .get(&product.product_type_id)
                .cloned()
                .flatten();
            listed.push(StoreCustomProduct { product, product_type });
        }

        Ok(StoreCustomProductPage {
            products: listed,
            count,
            limit,
            offset,
        })
    }
}

fn checked_schema(raw: &serde_json::Value) -> Result<FieldSchema> {
    parse_field_schema(raw).map_err(|e| AppError::BadRequest(e.to_string()))
}

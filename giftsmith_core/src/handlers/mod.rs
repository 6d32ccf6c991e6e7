pub mod custom_products;
pub mod health;
pub mod payments;
pub mod product_types;
pub mod routes;

pub mod connection;
pub mod migrations;
pub mod models;
pub mod repository;

pub use connection::{get_database_pool, DatabaseManager, DatabaseStats};
pub use migrations::{run_migrations, MigrationManager};
pub use repository::{
    CustomProductChanges, CustomProductRepository, ListParams, NewCustomProduct, NewOrder,
    NewProductType, OrderChanges, OrderRepository, ProductTypeChanges, ProductTypeRepository,
    Repository, SortOrder,
};

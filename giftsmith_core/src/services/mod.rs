pub mod payment_service;
pub mod product_type_service;

pub use payment_service::PaymentService;
pub use product_type_service::ProductTypeService;

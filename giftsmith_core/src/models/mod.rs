pub mod custom_product;
pub mod order;
pub mod payment;
pub mod product_type;

pub use custom_product::*;
pub use order::{Order, OrderStatus};
pub use payment::{CreatePaymentRequest, PaymentUrlResponse};
pub use product_type::*;

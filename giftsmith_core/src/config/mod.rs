pub mod settings;

pub use settings::{AppConfig, CorsConfig, DatabaseConfig, ServerConfig, VnpayConfig};

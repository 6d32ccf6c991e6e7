use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use url::Url;

/// Placeholder merchant secret shipped in the defaults. Real deployments
/// override it through `config.toml` or `APP_VNPAY__HASH_SECRET`.
pub const PLACEHOLDER_HASH_SECRET: &str = "change-me-vnpay-hash-secret";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub vnpay: VnpayConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connection_timeout_seconds: u64,
}

/// Merchant settings for the VNPay gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VnpayConfig {
    pub tmn_code: String,
    pub hash_secret: String,
    pub payment_url: String,
    pub return_url: String,
    pub ipn_url: String,
    pub version: String,
    pub command: String,
    pub currency_code: String,
    pub locale: String,
    pub order_type: String,
    pub expire_minutes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9000,
            request_timeout_seconds: 30,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:./giftsmith.db".to_string(),
            max_connections: 10,
            min_connections: 1,
            connection_timeout_seconds: 30,
        }
    }
}

impl Default for VnpayConfig {
    fn default() -> Self {
        Self {
            tmn_code: "DEMO0001".to_string(),
            hash_secret: PLACEHOLDER_HASH_SECRET.to_string(),
            payment_url: "https://sandbox.vnpayment.vn/paymentv2/vpcpay.html".to_string(),
            return_url: "http://localhost:8000/payment/callback".to_string(),
            ipn_url: "http://localhost:9000/store/vnpay/ipn".to_string(),
            version: "2.1.0".to_string(),
            command: "pay".to_string(),
            currency_code: "VND".to_string(),
            locale: "vn".to_string(),
            order_type: "other".to_string(),
            expire_minutes: 15,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:8000".to_string(),
                "http://localhost:7001".to_string(),
            ],
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?);

        if std::path::Path::new("config.toml").exists() {
            builder = builder.add_source(File::with_name("config"));
        }

        // Field names contain underscores, so nesting uses a double underscore:
        // APP_VNPAY__HASH_SECRET, APP_CORS__ALLOWED_ORIGINS=a,b
        builder = builder.add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("cors.allowed_origins")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        app_config.validate()?;

        Ok(app_config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("Server port cannot be 0".to_string()));
        }

        if self.database.url.is_empty() {
            return Err(ConfigError::Message(
                "Database URL cannot be empty".to_string(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Message(
                "Database max connections must be greater than 0".to_string(),
            ));
        }

        if self.vnpay.tmn_code.is_empty() {
            return Err(ConfigError::Message(
                "VNPay TMN code cannot be empty".to_string(),
            ));
        }

        if self.vnpay.hash_secret.is_empty() {
            return Err(ConfigError::Message(
                "VNPay hash secret cannot be empty".to_string(),
            ));
        }

        if self.vnpay.hash_secret == PLACEHOLDER_HASH_SECRET {
            tracing::warn!("Using placeholder VNPay hash secret - change this in production!");
        }

        if self.vnpay.expire_minutes <= 0 {
            return Err(ConfigError::Message(
                "VNPay expiry must be greater than 0 minutes".to_string(),
            ));
        }

        if let Err(e) = Url::parse(&self.vnpay.payment_url) {
            return Err(ConfigError::Message(format!(
                "VNPay payment URL is invalid: {}",
                e
            )));
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.database.url, "sqlite:./giftsmith.db");
        assert_eq!(config.vnpay.version, "2.1.0");
        assert_eq!(config.vnpay.expire_minutes, 15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.vnpay.hash_secret = String::new();
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.vnpay.tmn_code = String::new();
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.vnpay.expire_minutes = 0;
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.vnpay.payment_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bind_address() {
        let mut config = AppConfig::default();
        config.server.host = "0.0.0.0".to_string();
        config.server.port = 8080;
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_config_loading() {
        let config = AppConfig::load().expect("Should load default configuration");

        assert!(!config.server.host.is_empty());
        assert!(config.server.port > 0);
        assert!(!config.vnpay.tmn_code.is_empty());
        assert!(!config.cors.allowed_origins.is_empty());
    }
}

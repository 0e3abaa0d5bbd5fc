//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `PAYMENTS` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use payments_service::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod error;
mod payment;
mod redis;
mod server;

pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use redis::RedisConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Payment configuration (Stripe keys and redirect URLs)
    pub payment: PaymentConfig,

    /// Redis configuration (message bus)
    pub redis: RedisConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `PAYMENTS` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `PAYMENTS__SERVER__PORT=3003` -> `server.port = 3003`
    /// - `PAYMENTS__PAYMENT__STRIPE_API_KEY=...` -> `payment.stripe_api_key = ...`
    /// - `PAYMENTS__REDIS__URL=...` -> `redis.url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or cannot be
    /// parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PAYMENTS")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.payment.validate()?;
        self.redis.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("PAYMENTS__PAYMENT__STRIPE_API_KEY", "sk_test_xxx");
        env::set_var("PAYMENTS__PAYMENT__STRIPE_WEBHOOK_SECRET", "whsec_xxx");
        env::set_var(
            "PAYMENTS__PAYMENT__STRIPE_SUCCESS_URL",
            "http://localhost:3003/payments/success",
        );
        env::set_var(
            "PAYMENTS__PAYMENT__STRIPE_CANCEL_URL",
            "http://localhost:3003/payments/cancel",
        );
        env::set_var("PAYMENTS__REDIS__URL", "redis://localhost:6379");
    }

    fn clear_env() {
        env::remove_var("PAYMENTS__PAYMENT__STRIPE_API_KEY");
        env::remove_var("PAYMENTS__PAYMENT__STRIPE_WEBHOOK_SECRET");
        env::remove_var("PAYMENTS__PAYMENT__STRIPE_SUCCESS_URL");
        env::remove_var("PAYMENTS__PAYMENT__STRIPE_CANCEL_URL");
        env::remove_var("PAYMENTS__REDIS__URL");
        env::remove_var("PAYMENTS__SERVER__PORT");
        env::remove_var("PAYMENTS__SERVER__ENVIRONMENT");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.payment.stripe_api_key, "sk_test_xxx");
        assert_eq!(
            config.payment.stripe_success_url,
            "http://localhost:3003/payments/success"
        );
        assert_eq!(config.redis.url, "redis://localhost:6379");
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3003);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.payment.stripe_api_base_url, "https://api.stripe.com");
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("PAYMENTS__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_custom_server_port() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("PAYMENTS__SERVER__PORT", "4000");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 4000);
    }

    #[test]
    fn test_missing_payment_section_fails() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("PAYMENTS__REDIS__URL", "redis://localhost:6379");
        let result = AppConfig::load();
        clear_env();

        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }
}

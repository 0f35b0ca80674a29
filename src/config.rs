//! Configuration management for the trip planner
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::PlannerError;
use crate::models::CurrencyCode;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for the trip planner
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TravelPlannerConfig {
    /// Exchange rate API configuration
    #[serde(default)]
    pub exchange: ExchangeConfig,
    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Recommendation defaults
    #[serde(default)]
    pub planner: PlannerConfig,
}

/// Exchange rate API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// Base URL for the exchange rate API
    #[serde(default = "default_exchange_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_exchange_timeout")]
    pub timeout_seconds: u32,
    /// Automatic retries for transient failures
    #[serde(default)]
    pub max_retries: u32,
}

/// Cache configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Lifetime of city search and exchange rate entries
    #[serde(default = "default_cache_ttl")]
    pub ttl_seconds: u64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_port")]
    pub port: u16,
}

/// Defaults applied when planning trips
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Trip length for one-way recommendations
    #[serde(default = "default_days")]
    pub default_days: u32,
    /// Trip length for return-trip recommendations
    #[serde(default = "default_return_days")]
    pub return_days: u32,
    /// Share of the budget available for one-way transport
    #[serde(default = "default_transport_share")]
    pub transport_share: f64,
    /// Share of the budget available for transport on return trips
    #[serde(default = "default_return_transport_share")]
    pub return_transport_share: f64,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Currency used when a request does not name one
    #[serde(default = "default_currency")]
    pub currency: String,
}

// Default value functions
fn default_exchange_base_url() -> String {
    "https://open.er-api.com/v6".to_string()
}

fn default_exchange_timeout() -> u32 {
    10
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_server_port() -> u16 {
    3000
}

fn default_days() -> u32 {
    7
}

fn default_return_days() -> u32 {
    14
}

fn default_transport_share() -> f64 {
    0.4
}

fn default_return_transport_share() -> f64 {
    0.3
}

fn default_max_results() -> usize {
    5
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            base_url: default_exchange_base_url(),
            timeout_seconds: default_exchange_timeout(),
            max_retries: 0,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_cache_ttl(),
        }
    }
}

impl CacheConfig {
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_days: default_days(),
            return_days: default_return_days(),
            transport_share: default_transport_share(),
            return_transport_share: default_return_transport_share(),
            max_results: default_max_results(),
            currency: default_currency(),
        }
    }
}

impl PlannerConfig {
    /// The configured default currency
    pub fn currency(&self) -> crate::Result<CurrencyCode> {
        self.currency.parse()
    }
}

impl TravelPlannerConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. TRIPPLANNER_SERVER__PORT=8080
        builder = builder.add_source(
            Environment::with_prefix("TRIPPLANNER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: TravelPlannerConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("trip-planner").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.exchange.base_url.is_empty() {
            self.exchange.base_url = default_exchange_base_url();
        }
        if self.exchange.timeout_seconds == 0 {
            self.exchange.timeout_seconds = default_exchange_timeout();
        }
        if self.cache.ttl_seconds == 0 {
            self.cache.ttl_seconds = default_cache_ttl();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.server.port == 0 {
            self.server.port = default_server_port();
        }
        if self.planner.default_days == 0 {
            self.planner.default_days = default_days();
        }
        if self.planner.return_days == 0 {
            self.planner.return_days = default_return_days();
        }
        if self.planner.max_results == 0 {
            self.planner.max_results = default_max_results();
        }
        if self.planner.currency.is_empty() {
            self.planner.currency = default_currency();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.exchange.timeout_seconds > 300 {
            return Err(
                PlannerError::config("Exchange API timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.exchange.max_retries > 10 {
            return Err(PlannerError::config("Exchange API max retries cannot exceed 10").into());
        }

        if self.cache.ttl_seconds > 7 * 24 * 3600 {
            return Err(PlannerError::config("Cache TTL cannot exceed one week").into());
        }

        for (name, share) in [
            ("transport_share", self.planner.transport_share),
            ("return_transport_share", self.planner.return_transport_share),
        ] {
            if !(share > 0.0 && share <= 1.0) {
                return Err(PlannerError::config(format!(
                    "Planner {name} must be in (0, 1], got {share}"
                ))
                .into());
            }
        }

        if self.planner.default_days > 90 || self.planner.return_days > 90 {
            return Err(PlannerError::config("Trip length cannot exceed 90 days").into());
        }

        if self.planner.max_results > 50 {
            return Err(PlannerError::config("Maximum results cannot exceed 50").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(PlannerError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(PlannerError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.exchange.base_url.starts_with("http://")
            && !self.exchange.base_url.starts_with("https://")
        {
            return Err(PlannerError::config(
                "Exchange API base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        self.planner.currency().map_err(|_| {
            PlannerError::config(format!(
                "Invalid default currency '{}'",
                self.planner.currency
            ))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = TravelPlannerConfig::default();
        assert_eq!(config.exchange.base_url, "https://open.er-api.com/v6");
        assert_eq!(config.exchange.max_retries, 0);
        assert_eq!(config.cache.ttl(), Duration::from_secs(3600));
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.planner.default_days, 7);
        assert_eq!(config.planner.return_days, 14);
        assert_eq!(config.planner.transport_share, 0.4);
        assert_eq!(config.planner.return_transport_share, 0.3);
        assert!(config.planner.currency().unwrap().is_usd());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = TravelPlannerConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = TravelPlannerConfig::default();
        config.exchange.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_config_validation_transport_share() {
        let mut config = TravelPlannerConfig::default();
        config.planner.transport_share = 1.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("transport_share"));
    }

    #[test]
    fn test_config_validation_currency() {
        let mut config = TravelPlannerConfig::default();
        config.planner.currency = "dollars".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_defaults() {
        let mut config = TravelPlannerConfig::default();
        config.cache.ttl_seconds = 0;
        config.planner.currency.clear();
        config.server.port = 0;
        config.apply_defaults();
        assert_eq!(config.cache.ttl_seconds, 3600);
        assert_eq!(config.planner.currency, "USD");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[cache]
ttl_seconds = 120

[planner]
max_results = 3
currency = "EUR"
"#
        )
        .unwrap();

        let config = TravelPlannerConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.cache.ttl_seconds, 120);
        assert_eq!(config.planner.max_results, 3);
        assert_eq!(config.planner.currency, "EUR");
        assert_eq!(config.planner.default_days, 7);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[logging]\nformat = \"xml\"").unwrap();

        let result = TravelPlannerConfig::load_from_path(Some(file.path().to_path_buf()));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_path_generation() {
        let path = TravelPlannerConfig::get_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("trip-planner"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }
}

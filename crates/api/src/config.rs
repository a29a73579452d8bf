//! Application configuration loaded from environment variables.

use fulfillment::{DEFAULT_CHANNEL, DEFAULT_WAREHOUSE_CODE, EngineConfig, SupplierConfig};

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT` — `text` or `json` (default: `text`)
/// - `IDEMPOTENCY_ENABLED` — suppress redelivered events (default: `true`)
/// - `BROKER_ENABLED` — forward events through the broker (default: `true`)
/// - `DEFAULT_CHANNEL` — logistics channel for new orders
/// - `DEFAULT_SUPPLIER_ID` / `DEFAULT_SUPPLIER_NAME` — replenishment supplier
/// - `DEFAULT_WAREHOUSE_CODE` — warehouse fulfillment reserves from
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
    pub idempotency_enabled: bool,
    pub broker_enabled: bool,
    pub default_channel: String,
    pub supplier_id: String,
    pub supplier_name: String,
    pub default_warehouse_code: String,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let flag = |key: &str, default: bool| {
            lookup(key)
                .and_then(|v| parse_flag(&v))
                .unwrap_or(default)
        };

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: lookup("LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or_default(),
            idempotency_enabled: flag("IDEMPOTENCY_ENABLED", defaults.idempotency_enabled),
            broker_enabled: flag("BROKER_ENABLED", defaults.broker_enabled),
            default_channel: lookup("DEFAULT_CHANNEL").unwrap_or(defaults.default_channel),
            supplier_id: lookup("DEFAULT_SUPPLIER_ID").unwrap_or(defaults.supplier_id),
            supplier_name: lookup("DEFAULT_SUPPLIER_NAME").unwrap_or(defaults.supplier_name),
            default_warehouse_code: lookup("DEFAULT_WAREHOUSE_CODE")
                .unwrap_or(defaults.default_warehouse_code),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The engine settings carried by this configuration.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            idempotency_enabled: self.idempotency_enabled,
            broker_enabled: self.broker_enabled,
            default_channel: self.default_channel.clone(),
            supplier: SupplierConfig {
                supplier_id: self.supplier_id.clone(),
                supplier_name: self.supplier_name.clone(),
            },
            default_warehouse_code: self.default_warehouse_code.clone(),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Default for Config {
    fn default() -> Self {
        let supplier = SupplierConfig::default();
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            idempotency_enabled: true,
            broker_enabled: true,
            default_channel: DEFAULT_CHANNEL.to_string(),
            supplier_id: supplier.supplier_id,
            supplier_name: supplier.supplier_name,
            default_warehouse_code: DEFAULT_WAREHOUSE_CODE.to_string(),
        }
    }
}

//! Server configuration from the environment

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use pricing_api::{EvaluatorConfig, PricingError};
use thiserror::Error;

/// Errors raised while reading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} has an invalid value '{value}': {reason}")]
    InvalidVar {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid evaluator configuration: {0}")]
    Evaluator(#[from] PricingError),
}

/// Everything the server binary needs to start
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the JSON tables
    pub data_dir: PathBuf,
    /// Base URL to fetch tables from instead of `data_dir`
    pub tables_url: Option<String>,
    /// Timeout for fetching remote tables
    pub fetch_timeout: Duration,
    pub evaluator: EvaluatorConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            data_dir: PathBuf::from("data"),
            tables_url: None,
            fetch_timeout: Duration::from_secs(30),
            evaluator: EvaluatorConfig::default(),
        }
    }
}

fn parse_var<T>(name: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::InvalidVar {
        name,
        reason: e.to_string(),
        value,
    })
}

impl ServerConfig {
    /// Read `.env` if present, then the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable lookup; unset variables keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let evaluator = &mut config.evaluator;

        if let Some(host) = lookup("HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("PORT") {
            config.port = parse_var("PORT", port)?;
        }
        if let Some(dir) = lookup("PRICING_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        config.tables_url = lookup("PRICING_TABLES_URL").filter(|url| !url.is_empty());
        if let Some(secs) = lookup("PRICING_FETCH_TIMEOUT_SECS") {
            config.fetch_timeout = Duration::from_secs(parse_var("PRICING_FETCH_TIMEOUT_SECS", secs)?);
        }
        if let Some(month) = lookup("PRICING_REFERENCE_MONTH") {
            evaluator.reference_month = parse_var("PRICING_REFERENCE_MONTH", month)?;
        }
        if let Some(size) = lookup("PRICING_WINDOW_SIZE") {
            evaluator.window_size = parse_var("PRICING_WINDOW_SIZE", size)?;
        }
        if let Some(policy) = lookup("PRICING_WINDOW_POLICY") {
            evaluator.window_policy = parse_var("PRICING_WINDOW_POLICY", policy)?;
        }
        if let Some(clamp) = lookup("PRICING_CLAMP") {
            evaluator.clamp = parse_var("PRICING_CLAMP", clamp)?;
        }
        if let Some(round) = lookup("PRICING_ROUND_CENTS") {
            evaluator.round_to_cents = parse_var("PRICING_ROUND_CENTS", round)?;
        }

        config.evaluator.validate()?;
        Ok(config)
    }

    /// Socket address to bind
    pub fn addr(&self) -> Result<SocketAddr, ConfigError> {
        parse_var("HOST", format!("{}:{}", self.host, self.port))
    }
}

//! Configuration management for CostGuard
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `COSTGUARD__*` environment variables (`__` separates nested keys).

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "COSTGUARD";

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Classifier configuration
    pub classifier: ClassifierConfig,

    /// Notifier configuration
    pub notifier: NotifierConfig,

    /// Server configuration
    pub server: ServerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from defaults, an optional file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = ::config::Config::builder()
            .add_source(::config::Config::try_from(&Config::default())?);

        if let Some(path) = path {
            if !path.exists() {
                return Err(Error::config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(::config::File::from(path));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("classifier.free_tier_instance_types")
                .try_parsing(true),
        );

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the handler cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.notifier.topic_arn.trim().is_empty() {
            return Err(Error::config("notifier.topic_arn must not be empty"));
        }
        if self.classifier.free_tier_instance_types.is_empty() {
            return Err(Error::config(
                "classifier.free_tier_instance_types must list at least one type",
            ));
        }
        if let Some(url) = &self.notifier.webhook_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::config(format!(
                    "notifier.webhook_url must be an http(s) URL, got {url}"
                )));
            }
        }
        Ok(())
    }
}

/// Classifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// EC2 instance types that do not raise an alert
    pub free_tier_instance_types: Vec<String>,
    /// Largest EBS volume, in GB, that does not raise an alert
    pub ebs_free_tier_gb: i64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            free_tier_instance_types: vec!["t2.micro".to_string(), "t3.micro".to_string()],
            ebs_free_tier_gb: 30,
        }
    }
}

/// Notifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    /// Destination every alert is addressed to
    pub topic_arn: String,
    /// Webhook that receives alerts; alerts are only logged when unset
    pub webhook_url: Option<String>,
    /// Request timeout for webhook delivery
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            topic_arn: "arn:aws:sns:us-east-1:000000000000:root-account-alerts".to_string(),
            webhook_url: None,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// HTTP port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (json or pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

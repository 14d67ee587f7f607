//! Configuration loading and validation for `cloudctl`.
//!
//! Only the binary's own settings live here; provider and tool settings are
//! read by [`cloud_helpers::Settings`].

use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated `cloudctl` configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// OTLP endpoint for span export. Export is off when unset.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build cloudctl configuration")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise cloudctl configuration")?;

        c.validate()?;
        Ok(c)
    }

    fn validate(&self) -> Result<()> {
        if self.log_level.trim().is_empty() {
            anyhow::bail!("LOG_LEVEL must not be empty");
        }
        Ok(())
    }

    /// OTLP endpoint, if span export is enabled.
    pub fn otlp_endpoint(&self) -> Option<&str> {
        self.otel_exporter_otlp_endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn validate_rejects_blank_log_level() {
        let cfg = Config {
            log_level: " ".into(),
            otel_exporter_otlp_endpoint: None,
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn blank_endpoint_disables_export() {
        let cfg = Config {
            log_level: default_log_level(),
            otel_exporter_otlp_endpoint: Some("  ".into()),
        };
        assert!(cfg.validate().is_ok());
        assert!(cfg.otlp_endpoint().is_none());

        let cfg = Config {
            otel_exporter_otlp_endpoint: Some("http://127.0.0.1:4317".into()),
            ..cfg
        };
        assert_eq!(cfg.otlp_endpoint(), Some("http://127.0.0.1:4317"));
    }
}

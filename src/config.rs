use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::env;
use std::time::Duration;
use tracing::{info, warn};

use crate::retry::RetryPolicy;

// Import logging macros
use crate::{log_system_event, log_validation};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.2:3b";

/// Complete application configuration loaded from environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub ollama: OllamaConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// Ollama inference backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
    pub request_timeout_ms: u64,
    pub probe_timeout_ms: u64,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

/// Logging system configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_enabled: bool,
    pub console_enabled: bool,
    pub log_directory: String,
}

impl Config {
    /// Load configuration from environment variables with sensible defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        log_system_event!(config, "Loading application configuration");

        let config = Config {
            ollama: OllamaConfig::from_lookup(&lookup)?,
            server: ServerConfig::from_lookup(&lookup)?,
            logging: LoggingConfig::from_lookup(&lookup),
        };

        log_system_event!(config, "Configuration loaded successfully");
        Ok(config)
    }

    /// Log a summary of loaded configuration
    pub fn log_configuration_summary(&self) {
        info!(
            ollama_url = %self.ollama.base_url,
            model = %self.ollama.model,
            max_attempts = self.ollama.max_attempts,
            retry_delay_ms = self.ollama.retry_delay_ms,
            request_timeout_ms = self.ollama.request_timeout_ms,
            probe_timeout_ms = self.ollama.probe_timeout_ms,
            server_address = %self.server.address(),
            log_level = %self.logging.level,
            "Configuration summary"
        );
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !self.ollama.base_url.starts_with("http://")
            && !self.ollama.base_url.starts_with("https://")
        {
            return Err(anyhow!(
                "OLLAMA_URL must start with 'http://' or 'https://', got '{}'",
                self.ollama.base_url
            ));
        }

        if self.ollama.model.trim().is_empty() {
            return Err(anyhow!("OLLAMA_MODEL must not be empty"));
        }

        if self.ollama.max_attempts == 0 {
            return Err(anyhow!("OLLAMA_MAX_ATTEMPTS must be at least 1"));
        }

        if self.ollama.request_timeout_ms == 0 || self.ollama.probe_timeout_ms == 0 {
            return Err(anyhow!("Backend timeouts must be greater than 0"));
        }

        if self.server.port == 0 {
            return Err(anyhow!("Server port must be greater than 0"));
        }

        // RUST_LOG may carry directives such as "info,flashcard_api=debug"; only check the default level
        let default_level = self
            .logging
            .level
            .split(',')
            .next()
            .unwrap_or_default()
            .to_lowercase();
        if !default_level.contains('=')
            && !["trace", "debug", "info", "warn", "error", "off"].contains(&default_level.as_str())
        {
            warn!("Invalid log level '{}', using 'info' as fallback", self.logging.level);
        }

        log_validation!(success, "configuration", "Configuration validation completed successfully");
        Ok(())
    }
}

impl OllamaConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("OLLAMA_URL")
            .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let model = lookup("OLLAMA_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(OllamaConfig {
            base_url,
            model,
            max_attempts: parse_var(lookup, "OLLAMA_MAX_ATTEMPTS", 3)?,
            retry_delay_ms: parse_var(lookup, "OLLAMA_RETRY_DELAY_MS", 2000)?,
            request_timeout_ms: parse_var(lookup, "OLLAMA_TIMEOUT_MS", 120_000)?,
            probe_timeout_ms: parse_var(lookup, "OLLAMA_PROBE_TIMEOUT_MS", 5000)?,
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.retry_delay_ms))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_attempts: 3,
            retry_delay_ms: 2000,
            request_timeout_ms: 120_000,
            probe_timeout_ms: 5000,
        }
    }
}

impl ServerConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port_str = lookup("PORT").unwrap_or_else(|| "3000".to_string());

        let port = port_str.parse::<u16>().map_err(|_| {
            anyhow!("Invalid PORT value: '{}'. Must be a number between 1-65535", port_str)
        })?;

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        Ok(ServerConfig { port, host })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl LoggingConfig {
    fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let level = lookup("RUST_LOG").unwrap_or_else(|| "info,flashcard_api=debug".to_string());

        let file_enabled = lookup("LOG_FILE_ENABLED")
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(true);

        let console_enabled = lookup("LOG_CONSOLE_ENABLED")
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(true);

        let log_directory = lookup("LOG_DIRECTORY").unwrap_or_else(|| "logs".to_string());

        LoggingConfig {
            level,
            file_enabled,
            console_enabled,
            log_directory,
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| anyhow!("Invalid {} value: '{}'. Must be a non-negative integer", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_ollama_config_defaults() {
        let config = OllamaConfig::from_lookup(&lookup_from(&[])).unwrap();
        assert_eq!(config.base_url, "http://localhost:11434");
        assert_eq!(config.model, "llama3.2:3b");
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.retry_delay_ms, 2000);
        assert_eq!(config.request_timeout_ms, 120_000);
        assert_eq!(config.probe_timeout_ms, 5000);
    }

    #[test]
    fn test_trailing_slash_stripped() {
        let config =
            OllamaConfig::from_lookup(&lookup_from(&[("OLLAMA_URL", "http://gpu-box:11434/")]))
                .unwrap();
        assert_eq!(config.base_url, "http://gpu-box:11434");
    }

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::from_lookup(&lookup_from(&[])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_invalid_numbers_name_the_variable() {
        let err = ServerConfig::from_lookup(&lookup_from(&[("PORT", "not-a-number")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));

        let err = OllamaConfig::from_lookup(&lookup_from(&[("OLLAMA_RETRY_DELAY_MS", "-5")]))
            .unwrap_err();
        assert!(err.to_string().contains("OLLAMA_RETRY_DELAY_MS"));
    }

    #[test]
    fn test_logging_flags_fall_back_on_garbage() {
        let config = LoggingConfig::from_lookup(&lookup_from(&[
            ("LOG_FILE_ENABLED", "false"),
            ("LOG_CONSOLE_ENABLED", "maybe"),
        ]));
        assert!(!config.file_enabled);
        assert!(config.console_enabled);
        assert_eq!(config.log_directory, "logs");
    }

    #[test]
    fn test_config_validation() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert!(config.validate().is_ok());

        let mut invalid = config.clone();
        invalid.server.port = 0;
        assert!(invalid.validate().is_err());

        let mut invalid = config.clone();
        invalid.ollama.max_attempts = 0;
        assert!(invalid.validate().is_err());

        let mut invalid = config.clone();
        invalid.ollama.base_url = "localhost:11434".to_string();
        assert!(invalid.validate().is_err());

        let mut invalid = config;
        invalid.ollama.request_timeout_ms = 0;
        assert!(invalid.validate().is_err());
    }
}

//! # Environment-Based Configuration
//!
//! Coordinator settings can be overridden through environment variables so a
//! host can tune retry behaviour without a rebuild.
//!
//! ## Environment Variables
//!
//! - `CONDUCTOR_RETRY_MAX_ATTEMPTS` - Attempts per step before a hard failure (default: 3)
//! - `CONDUCTOR_RETRY_BACKOFF_MS` - Linear backoff unit in milliseconds (default: 500)
//! - `CONDUCTOR_RETRY_MAX_JITTER_MS` - Upper bound of the random jitter in milliseconds (default: 100)

use conductor_core::RetryPolicy;
use std::{env, time::Duration};

pub const ENV_RETRY_MAX_ATTEMPTS: &str = "CONDUCTOR_RETRY_MAX_ATTEMPTS";
pub const ENV_RETRY_BACKOFF_MS: &str = "CONDUCTOR_RETRY_BACKOFF_MS";
pub const ENV_RETRY_MAX_JITTER_MS: &str = "CONDUCTOR_RETRY_MAX_JITTER_MS";

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid environment variable '{key}': {message}")]
    InvalidEnvVar { key: String, message: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Settings applied by the coordinator to every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoordinatorConfig {
    pub retry: RetryPolicy,
}

impl CoordinatorConfig {
    /// Start a builder with default values
    #[must_use]
    pub fn builder() -> CoordinatorConfigBuilder {
        CoordinatorConfigBuilder::new()
    }

    /// Load and validate configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is malformed or the result is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        CoordinatorConfigBuilder::from_env()?.build()
    }
}

/// Builder for `CoordinatorConfig` with environment variable support
#[derive(Debug, Clone)]
pub struct CoordinatorConfigBuilder {
    max_attempts: u32,
    backoff_ms: u64,
    max_jitter_ms: u64,
}

impl Default for CoordinatorConfigBuilder {
    fn default() -> Self {
        let retry = RetryPolicy::default();
        Self {
            max_attempts: retry.max_attempts,
            backoff_ms: retry.backoff.as_millis() as u64,
            max_jitter_ms: retry.max_jitter.as_millis() as u64,
        }
    }
}

impl CoordinatorConfigBuilder {
    /// Create a new builder with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any environment variable has an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any looked-up value is not a valid number.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::default();

        if let Some(attempts) = parse_u32(&lookup, ENV_RETRY_MAX_ATTEMPTS)? {
            builder = builder.max_attempts(attempts);
        }
        if let Some(backoff) = parse_u64(&lookup, ENV_RETRY_BACKOFF_MS)? {
            builder = builder.backoff_ms(backoff);
        }
        if let Some(jitter) = parse_u64(&lookup, ENV_RETRY_MAX_JITTER_MS)? {
            builder = builder.max_jitter_ms(jitter);
        }

        tracing::debug!(
            max_attempts = builder.max_attempts,
            backoff_ms = builder.backoff_ms,
            max_jitter_ms = builder.max_jitter_ms,
            "Loaded coordinator configuration"
        );
        Ok(builder)
    }

    /// Set the attempt cap per step
    #[must_use]
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Set the linear backoff unit in milliseconds
    #[must_use]
    pub fn backoff_ms(mut self, backoff_ms: u64) -> Self {
        self.backoff_ms = backoff_ms;
        self
    }

    /// Set the jitter upper bound in milliseconds
    #[must_use]
    pub fn max_jitter_ms(mut self, max_jitter_ms: u64) -> Self {
        self.max_jitter_ms = max_jitter_ms;
        self
    }

    /// Validate configuration and build `CoordinatorConfig`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if the configuration is invalid.
    pub fn build(self) -> Result<CoordinatorConfig, ConfigError> {
        self.validate()?;

        Ok(CoordinatorConfig {
            retry: RetryPolicy::new(self.max_attempts)
                .with_backoff(Duration::from_millis(self.backoff_ms))
                .with_max_jitter(Duration::from_millis(self.max_jitter_ms)),
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "max_attempts must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_u64<F>(lookup: &F, key: &str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) => val
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidEnvVar {
                key: key.to_string(),
                message: format!("invalid u64 value '{val}': {e}"),
            }),
        None => Ok(None),
    }
}

fn parse_u32<F>(lookup: &F, key: &str) -> Result<Option<u32>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) => val
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidEnvVar {
                key: key.to_string(),
                message: format!("invalid u32 value '{val}': {e}"),
            }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_default_builder() {
        let config = CoordinatorConfig::builder().build().unwrap();
        assert_eq!(config, CoordinatorConfig::default());
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.backoff, Duration::from_millis(500));
    }

    #[test]
    fn test_lookup_overrides() {
        let config = CoordinatorConfigBuilder::from_lookup(lookup(&[
            (ENV_RETRY_MAX_ATTEMPTS, "5"),
            (ENV_RETRY_BACKOFF_MS, "20"),
            (ENV_RETRY_MAX_JITTER_MS, "0"),
        ]))
        .unwrap()
        .build()
        .unwrap();

        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.backoff, Duration::from_millis(20));
        assert_eq!(config.retry.max_jitter, Duration::ZERO);
    }

    #[test]
    fn test_invalid_number() {
        let err = CoordinatorConfigBuilder::from_lookup(lookup(&[(ENV_RETRY_BACKOFF_MS, "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_RETRY_BACKOFF_MS));
    }

    #[test]
    fn test_builder_validation_attempts() {
        let result = CoordinatorConfig::builder().max_attempts(0).build();
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("max_attempts must be greater than 0")
        );
    }
}

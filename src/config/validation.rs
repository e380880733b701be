//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, limits > 0, address parses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::ServerConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("limits.max_body_size must be greater than zero")]
    ZeroBodyLimit,

    #[error("observability.log_level `{0}` is not one of trace, debug, info, warn, error")]
    LogLevel(String),
}

/// Check every rule and report all violations.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }
    if config.limits.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }
    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::LogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(validate_config(&ServerConfig::default()), Ok(()));
    }

    #[test]
    fn test_reports_every_error() {
        let mut config = ServerConfig::default();
        config.listener.bind_address = "localhost".into();
        config.timeouts.request_secs = 0;
        config.limits.max_body_size = 0;
        config.observability.log_level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::BindAddress("localhost".into()),
                ValidationError::ZeroRequestTimeout,
                ValidationError::ZeroBodyLimit,
                ValidationError::LogLevel("loud".into()),
            ]
        );
    }

    #[test]
    fn test_log_level_case_insensitive() {
        let mut config = ServerConfig::default();
        config.observability.log_level = "DEBUG".into();
        assert!(validate_config(&config).is_ok());
    }
}

// SPDX-FileCopyrightText: 2026 Storyloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses, known backend names, and
//! sensible generation parameters.

use crate::diagnostic::ConfigError;
use crate::model::StoryloomConfig;

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const VALID_AUTH_BACKENDS: &[&str] = &["memory", "remote"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &StoryloomConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !VALID_LOG_LEVELS.contains(&config.app.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "app.log_level must be one of {}, got `{}`",
                VALID_LOG_LEVELS.join(", "),
                config.app.log_level
            ),
        });
    }

    // Validate gateway.host is not empty and looks like an IP or hostname
    let host = config.gateway.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("gateway.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.captioner.endpoint.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "captioner.endpoint must not be empty".to_string(),
        });
    }

    if config.generator.api_base.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "generator.api_base must not be empty".to_string(),
        });
    }

    if !(0.0..=2.0).contains(&config.generator.temperature) {
        errors.push(ConfigError::Validation {
            message: format!(
                "generator.temperature must be between 0.0 and 2.0, got {}",
                config.generator.temperature
            ),
        });
    }

    if config.generator.length_options.is_empty() {
        errors.push(ConfigError::Validation {
            message: "generator.length_options must not be empty".to_string(),
        });
    }
    for (i, len) in config.generator.length_options.iter().enumerate() {
        if *len == 0 {
            errors.push(ConfigError::Validation {
                message: format!("generator.length_options[{i}] must be positive"),
            });
        }
    }

    if !VALID_AUTH_BACKENDS.contains(&config.auth.backend.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "auth.backend must be one of {}, got `{}`",
                VALID_AUTH_BACKENDS.join(", "),
                config.auth.backend
            ),
        });
    }

    if config.auth.backend == "remote" && config.auth.provider_url.is_none() {
        errors.push(ConfigError::Validation {
            message: "auth.provider_url is required when auth.backend = \"remote\"".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

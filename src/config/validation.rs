//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and value ranges
//! - Check that the request timeout leaves room for the slow-roll delay
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

use crate::config::schema::{ContextMode, ProviderKind, ServiceConfig};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} `{value}` is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("flags.key must not be empty")]
    EmptyFlagKey,

    #[error("flags.host must not be empty for the flagd provider")]
    EmptyFlagdHost,

    #[error("flags.port must be non-zero for the flagd provider")]
    ZeroFlagdPort,

    #[error("flags.context = \"targeted\" requires flags.targeting_key")]
    MissingTargetingKey,

    #[error("timeouts.request_secs ({request_secs}s) must exceed delay.slow_roll_ms ({delay_ms}ms)")]
    TimeoutTooShort { request_secs: u64, delay_ms: u64 },
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    let flags = &config.flags;
    if flags.key.trim().is_empty() {
        errors.push(ValidationError::EmptyFlagKey);
    }
    if flags.provider == ProviderKind::Flagd {
        if flags.host.trim().is_empty() {
            errors.push(ValidationError::EmptyFlagdHost);
        }
        if flags.port == 0 {
            errors.push(ValidationError::ZeroFlagdPort);
        }
    }
    if flags.context == ContextMode::Targeted
        && flags.targeting_key.as_deref().map_or(true, |k| k.trim().is_empty())
    {
        errors.push(ValidationError::MissingTargetingKey);
    }

    if Duration::from_secs(config.timeouts.request_secs) <= config.delay.slow_roll() {
        errors.push(ValidationError::TimeoutTooShort {
            request_secs: config.timeouts.request_secs,
            delay_ms: config.delay.slow_roll_ms,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

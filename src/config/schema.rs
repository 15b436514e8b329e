//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Root configuration for the dice service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Behaviour of the `/` route.
    pub homepage: HomepageConfig,

    /// Feature flag provider settings.
    pub flags: FlagsConfig,

    /// Artificial latency injected when the slow-roll flag is on.
    pub delay: DelayConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// How `/` points clients at `/rolldice`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HomepageMode {
    /// 308 Permanent Redirect to `/rolldice`.
    #[default]
    Redirect,
    /// Plain-text instructions.
    Hint,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HomepageConfig {
    pub mode: HomepageMode,
}

/// Which flag provider backs evaluations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// flagd over its HTTP evaluation API.
    #[default]
    Flagd,
    /// In-memory values from `static_values`.
    Static,
}

/// What the evaluation context sent with each flag evaluation carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextMode {
    /// No attributes at all.
    Empty,
    /// The request's `User-Agent` under `userAgent`.
    #[default]
    UserAgent,
    /// `userAgent` plus the configured targeting key.
    Targeted,
}

/// Feature flag configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FlagsConfig {
    /// Provider used to resolve flags.
    pub provider: ProviderKind,

    /// Key of the boolean flag gating the slow roll.
    pub key: String,

    /// Evaluation context shape.
    pub context: ContextMode,

    /// Targeting key sent in `targeted` mode.
    pub targeting_key: Option<String>,

    /// flagd host.
    pub host: String,

    /// flagd port.
    pub port: u16,

    /// Use HTTPS towards flagd.
    pub tls: bool,

    /// Per-evaluation HTTP timeout in milliseconds. Unset means no client timeout.
    pub timeout_ms: Option<u64>,

    /// Values served by the static provider.
    pub static_values: HashMap<String, bool>,
}

impl Default for FlagsConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Flagd,
            key: "slow-your-roll".to_string(),
            context: ContextMode::UserAgent,
            targeting_key: None,
            host: "localhost".to_string(),
            port: 8013,
            tls: false,
            timeout_ms: None,
            static_values: HashMap::new(),
        }
    }
}

/// Slow-roll delay configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DelayConfig {
    /// Delay applied when the flag is on, in milliseconds.
    pub slow_roll_ms: u64,
}

impl DelayConfig {
    pub fn slow_roll(&self) -> Duration {
        Duration::from_millis(self.slow_roll_ms)
    }
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self { slow_roll_ms: 2_000 }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub log_level: String,

    /// Log line format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,

    /// OTLP gRPC endpoint for span export (needs the `otel` feature).
    pub otlp_endpoint: Option<String>,

    /// `service.name` resource attribute on exported spans.
    pub service_name: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "rolldice=info,tower_http=info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
            otlp_endpoint: None,
            service_name: "rolldice".to_string(),
        }
    }
}

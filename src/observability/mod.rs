//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (dice.rolls counter)
//!     → tracing.rs (request and roll spans)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//!     → OTLP collector (optional, `otel` feature)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through the request span
//! - Metrics are cheap (atomic increments)
//! - Span export is optional to keep the default build small

pub mod logging;
pub mod metrics;
pub mod tracing;

pub use self::logging::{init_telemetry, TelemetryError, TelemetryGuard};
pub use self::metrics::{init_metrics, RollMetrics};

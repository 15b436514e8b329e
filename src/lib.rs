//! Dice-rolling HTTP service with flag-gated latency, tracing and metrics.

pub mod config;
pub mod dice;
pub mod flags;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::schema::ServiceConfig;
pub use http::{AppState, HttpServer};
pub use lifecycle::Shutdown;

//! Feature flag subsystem.
//!
//! # Data Flow
//! ```text
//! /rolldice handler
//!     → context.rs (build EvaluationContext from the request)
//!     → client.rs (evaluate-with-default, never fails)
//!     → provider.rs (FlagProvider trait)
//!         → flagd.rs (HTTP evaluation API on localhost:8013)
//!         → static_provider.rs (in-memory table)
//! ```
//!
//! # Design Decisions
//! - Provider errors are typed, but the client degrades them to the default
//! - Providers are trait objects injected through AppState
//! - No retries; a failed evaluation is a `false` flag

pub mod client;
pub mod context;
pub mod flagd;
pub mod provider;
pub mod static_provider;

pub use client::FlagClient;
pub use context::EvaluationContext;
pub use flagd::FlagdProvider;
pub use provider::{FlagError, FlagProvider};
pub use static_provider::StaticProvider;

use std::sync::Arc;

use crate::config::{FlagsConfig, ProviderKind};

/// Build the provider selected by configuration.
pub fn provider_from_config(config: &FlagsConfig) -> Result<Arc<dyn FlagProvider>, FlagError> {
    let provider: Arc<dyn FlagProvider> = match config.provider {
        ProviderKind::Flagd => Arc::new(FlagdProvider::from_config(config)?),
        ProviderKind::Static => Arc::new(StaticProvider::new(config.static_values.clone())),
    };
    Ok(provider)
}

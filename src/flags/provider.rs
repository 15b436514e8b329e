//! Flag provider abstraction.

use async_trait::async_trait;
use thiserror::Error;

use crate::flags::context::EvaluationContext;

/// Errors raised while resolving a flag.
#[derive(Debug, Error)]
pub enum FlagError {
    #[error("flag `{0}` not found")]
    FlagNotFound(String),

    #[error("flag `{0}` is not a boolean")]
    TypeMismatch(String),

    #[error("provider returned {code}: {message}")]
    Provider { code: String, message: String },

    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid provider endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// A backend able to resolve boolean flags.
#[async_trait]
pub trait FlagProvider: Send + Sync {
    /// Label reported as `feature_flag.provider_name`.
    fn name(&self) -> &'static str;

    async fn resolve_bool(&self, key: &str, context: &EvaluationContext) -> Result<bool, FlagError>;
}

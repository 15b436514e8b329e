//! Evaluate-with-default flag client.

use std::sync::Arc;

use crate::flags::context::EvaluationContext;
use crate::flags::provider::FlagProvider;

/// Front door for flag evaluation.
///
/// Evaluation never fails from the caller's point of view: any provider error
/// is logged at debug level and the supplied default is returned instead.
#[derive(Clone)]
pub struct FlagClient {
    provider: Arc<dyn FlagProvider>,
}

impl FlagClient {
    pub fn new(provider: Arc<dyn FlagProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub async fn boolean_value(&self, key: &str, default: bool, context: &EvaluationContext) -> bool {
        match self.provider.resolve_bool(key, context).await {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(
                    flag_key = %key,
                    provider = self.provider.name(),
                    error = %e,
                    default,
                    "Flag evaluation failed, using default"
                );
                default
            }
        }
    }
}

impl std::fmt::Debug for FlagClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlagClient")
            .field("provider", &self.provider.name())
            .finish()
    }
}

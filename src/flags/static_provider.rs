//! In-memory flag provider.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::flags::context::EvaluationContext;
use crate::flags::provider::{FlagError, FlagProvider};

/// Serves boolean flags from a fixed table, ignoring the evaluation context.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    values: HashMap<String, bool>,
}

impl StaticProvider {
    pub fn new(values: HashMap<String, bool>) -> Self {
        Self { values }
    }

    /// A provider holding a single flag.
    pub fn single(key: impl Into<String>, value: bool) -> Self {
        Self::new(HashMap::from([(key.into(), value)]))
    }
}

#[async_trait]
impl FlagProvider for StaticProvider {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn resolve_bool(&self, key: &str, _context: &EvaluationContext) -> Result<bool, FlagError> {
        self.values
            .get(key)
            .copied()
            .ok_or_else(|| FlagError::FlagNotFound(key.to_string()))
    }
}

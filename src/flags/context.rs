//! Evaluation context sent alongside a flag key.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::ContextMode;

/// Attribute key carrying the client's user agent.
pub const USER_AGENT_KEY: &str = "userAgent";

/// Targeting data for one evaluation.
///
/// Serializes to the flat JSON object flagd expects, with the targeting key
/// under `targetingKey` next to the attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EvaluationContext {
    #[serde(rename = "targetingKey", skip_serializing_if = "Option::is_none")]
    pub targeting_key: Option<String>,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, String>,
}

impl EvaluationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_targeting_key(mut self, key: impl Into<String>) -> Self {
        self.targeting_key = Some(key.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Build the context for a roll request according to `mode`.
    ///
    /// A missing `User-Agent` is sent as the empty string.
    pub fn for_request(mode: ContextMode, user_agent: Option<&str>, targeting_key: Option<&str>) -> Self {
        let user_agent = user_agent.unwrap_or_default();
        match mode {
            ContextMode::Empty => Self::new(),
            ContextMode::UserAgent => Self::new().with_attribute(USER_AGENT_KEY, user_agent),
            ContextMode::Targeted => {
                let ctx = Self::new().with_attribute(USER_AGENT_KEY, user_agent);
                match targeting_key {
                    Some(key) => ctx.with_targeting_key(key),
                    None => ctx,
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.targeting_key.is_none() && self.attributes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_mode_ignores_request() {
        let ctx = EvaluationContext::for_request(ContextMode::Empty, Some("curl/8.5"), Some("k"));
        assert!(ctx.is_empty());
        assert_eq!(serde_json::to_value(&ctx).unwrap(), json!({}));
    }

    #[test]
    fn user_agent_mode_defaults_to_empty_string() {
        let ctx = EvaluationContext::for_request(ContextMode::UserAgent, None, None);
        assert_eq!(ctx.attributes.get(USER_AGENT_KEY).map(String::as_str), Some(""));
        assert_eq!(ctx.targeting_key, None);
    }

    #[test]
    fn targeted_mode_serializes_flat() {
        let ctx = EvaluationContext::for_request(ContextMode::Targeted, Some("curl/8.5"), Some("rolldice"));
        assert_eq!(
            serde_json::to_value(&ctx).unwrap(),
            json!({"targetingKey": "rolldice", "userAgent": "curl/8.5"})
        );
    }

    #[test]
    fn debug_rendering_names_fields() {
        let ctx = EvaluationContext::new().with_attribute(USER_AGENT_KEY, "curl/8.5");
        let rendered = format!("{:?}", ctx);
        assert!(rendered.starts_with("EvaluationContext"));
        assert!(rendered.contains("\"userAgent\": \"curl/8.5\""));
    }
}

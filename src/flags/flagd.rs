//! flagd provider over the HTTP evaluation API.
//!
//! flagd serves its evaluation service over Connect, which accepts plain JSON
//! POSTs on the same port as gRPC:
//!
//! ```text
//! POST /flagd.evaluation.v1.Service/ResolveBoolean
//! {"flagKey": "slow-your-roll", "context": {"userAgent": "curl/8.5"}}
//!
//! 200 {"value": true, "reason": "TARGETING_MATCH", "variant": "on"}
//! 404 {"code": "not_found", "message": "flag: slow-your-roll not found"}
//! ```
//!
//! A `false` value is the protobuf default and may be omitted from the body.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::config::FlagsConfig;
use crate::flags::context::EvaluationContext;
use crate::flags::provider::{FlagError, FlagProvider};

const RESOLVE_BOOLEAN_PATH: &str = "flagd.evaluation.v1.Service/ResolveBoolean";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResolveRequest<'a> {
    flag_key: &'a str,
    context: &'a EvaluationContext,
}

#[derive(Deserialize)]
struct ResolveBooleanResponse {
    #[serde(default)]
    value: bool,
    #[serde(default)]
    reason: String,
    #[serde(default)]
    variant: String,
}

#[derive(Deserialize)]
struct ConnectError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Resolves flags against a flagd daemon.
#[derive(Debug, Clone)]
pub struct FlagdProvider {
    client: reqwest::Client,
    endpoint: Url,
}

impl FlagdProvider {
    /// Point at `scheme://host:port/`.
    pub fn new(base: Url, timeout: Option<Duration>) -> Result<Self, FlagError> {
        let endpoint = base.join(RESOLVE_BOOLEAN_PATH)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint,
        })
    }

    pub fn from_config(config: &FlagsConfig) -> Result<Self, FlagError> {
        let scheme = if config.tls { "https" } else { "http" };
        let base = Url::parse(&format!("{}://{}:{}/", scheme, config.host, config.port))?;
        let provider = Self::new(base, config.timeout_ms.map(Duration::from_millis))?;

        tracing::info!(endpoint = %provider.endpoint, "flagd provider configured");
        Ok(provider)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl FlagProvider for FlagdProvider {
    fn name(&self) -> &'static str {
        "flagd"
    }

    async fn resolve_bool(&self, key: &str, context: &EvaluationContext) -> Result<bool, FlagError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&ResolveRequest { flag_key: key, context })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error: ConnectError = serde_json::from_str(&body).unwrap_or(ConnectError {
                code: status.as_str().to_string(),
                message: body,
            });
            return Err(match error.code.as_str() {
                "not_found" => FlagError::FlagNotFound(key.to_string()),
                "invalid_argument" if error.message.contains("type") => {
                    FlagError::TypeMismatch(key.to_string())
                }
                _ => FlagError::Provider {
                    code: error.code,
                    message: error.message,
                },
            });
        }

        let resolved: ResolveBooleanResponse = response.json().await?;
        tracing::trace!(
            flag_key = %key,
            value = resolved.value,
            reason = %resolved.reason,
            variant = %resolved.variant,
            "Flag resolved"
        );
        Ok(resolved.value)
    }
}

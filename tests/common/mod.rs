//! Shared utilities for integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header::USER_AGENT, Request, Response},
    Router,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;
use tracing::{
    field::{Field, Visit},
    span::{Attributes, Id, Record},
    Event, Level, Subscriber,
};
use tracing_subscriber::{layer::Context, prelude::*, registry::LookupSpan, Layer};

use rolldice::config::{ProviderKind, ServiceConfig};
use rolldice::dice::Delay;
use rolldice::flags::{EvaluationContext, FlagClient, FlagError, FlagProvider};
use rolldice::observability::RollMetrics;
use rolldice::{AppState, HttpServer};

/// Defaults with the static provider and no metrics listener.
pub fn test_config() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.flags.provider = ProviderKind::Static;
    config.observability.metrics_enabled = false;
    config
}

pub fn build_state(
    config: &ServiceConfig,
    provider: Arc<dyn FlagProvider>,
    metrics: RollMetrics,
    delay: Arc<dyn Delay>,
) -> AppState {
    AppState::new(config, FlagClient::new(provider), metrics).with_delay(delay)
}

pub fn build_router(config: &ServiceConfig, state: AppState) -> Router {
    HttpServer::build_router(config, state)
}

/// Issue a GET through the router without a network listener.
pub async fn get(router: &Router, path: &str, user_agent: Option<&str>) -> Response<Body> {
    let mut request = Request::builder().uri(path);
    if let Some(ua) = user_agent {
        request = request.header(USER_AGENT, ua);
    }
    router
        .clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Assert `body` is one die face followed by a newline and return the face.
pub fn parse_face(body: &str) -> u8 {
    let bytes = body.as_bytes();
    assert_eq!(bytes.len(), 2, "unexpected body {:?}", body);
    assert!((b'1'..=b'6').contains(&bytes[0]), "unexpected body {:?}", body);
    assert_eq!(bytes[1], b'\n', "unexpected body {:?}", body);
    bytes[0] - b'0'
}

/// Records requested pauses instead of sleeping.
#[derive(Debug, Default)]
pub struct RecordingDelay {
    calls: Mutex<Vec<Duration>>,
}

impl RecordingDelay {
    pub fn calls(&self) -> Vec<Duration> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Delay for RecordingDelay {
    async fn pause(&self, duration: Duration) {
        self.calls.lock().unwrap().push(duration);
    }
}

/// Answers a fixed value and remembers every context it was asked with.
#[derive(Debug)]
pub struct RecordingProvider {
    value: bool,
    seen: Mutex<Vec<(String, EvaluationContext)>>,
}

impl RecordingProvider {
    pub fn new(value: bool) -> Self {
        Self {
            value,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn seen(&self) -> Vec<(String, EvaluationContext)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl FlagProvider for RecordingProvider {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn resolve_bool(&self, key: &str, context: &EvaluationContext) -> Result<bool, FlagError> {
        self.seen
            .lock()
            .unwrap()
            .push((key.to_string(), context.clone()));
        Ok(self.value)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpanRecord {
    pub name: String,
    pub parent: Option<String>,
    pub fields: HashMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct EventRecord {
    pub level: Level,
    pub message: String,
    pub span: Option<String>,
}

#[derive(Default)]
struct FieldMap(HashMap<String, String>);

impl Visit for FieldMap {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }
}

/// Collects closed spans and events for assertions.
#[derive(Clone, Default)]
pub struct Captured {
    spans: Arc<Mutex<Vec<SpanRecord>>>,
    events: Arc<Mutex<Vec<EventRecord>>>,
}

impl Captured {
    /// Install as the thread's default subscriber until the guard drops.
    pub fn install() -> (Self, tracing::subscriber::DefaultGuard) {
        let captured = Self::default();
        let subscriber = tracing_subscriber::registry().with(captured.clone());
        let guard = tracing::subscriber::set_default(subscriber);
        (captured, guard)
    }

    pub fn closed_spans(&self, name: &str) -> Vec<SpanRecord> {
        self.spans
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.name == name)
            .cloned()
            .collect()
    }

    pub fn events(&self, level: Level) -> Vec<EventRecord> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.level == level)
            .cloned()
            .collect()
    }
}

impl<S> Layer<S> for Captured
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut fields = FieldMap::default();
        attrs.record(&mut fields);
        if let Some(span) = ctx.span(id) {
            span.extensions_mut().insert(fields);
        }
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            if let Some(fields) = span.extensions_mut().get_mut::<FieldMap>() {
                values.record(fields);
            }
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let mut fields = FieldMap::default();
        event.record(&mut fields);
        self.events.lock().unwrap().push(EventRecord {
            level: *event.metadata().level(),
            message: fields.0.remove("message").unwrap_or_default(),
            span: ctx.event_span(event).map(|s| s.name().to_string()),
        });
    }

    fn on_close(&self, id: Id, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(&id) {
            let fields = span
                .extensions_mut()
                .remove::<FieldMap>()
                .unwrap_or_default();
            self.spans.lock().unwrap().push(SpanRecord {
                name: span.name().to_string(),
                parent: span.parent().map(|p| p.name().to_string()),
                fields: fields.0,
            });
        }
    }
}

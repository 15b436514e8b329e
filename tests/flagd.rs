//! flagd provider against a mock flagd evaluation endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use url::Url;

use rolldice::config::FlagsConfig;
use rolldice::flags::{EvaluationContext, FlagClient, FlagError, FlagProvider, FlagdProvider};
use rolldice::observability::RollMetrics;

mod common;
use common::*;

const RESOLVE_PATH: &str = "/flagd.evaluation.v1.Service/ResolveBoolean";

async fn resolve_boolean(Json(request): Json<Value>) -> Response {
    let user_agent = request["context"]["userAgent"].as_str().unwrap_or_default();
    match request["flagKey"].as_str() {
        Some("slow-your-roll") if user_agent == "slowpoke" => {
            Json(json!({"value": true, "reason": "TARGETING_MATCH", "variant": "on"})).into_response()
        }
        // flagd omits `false`, the protobuf default.
        Some("slow-your-roll") => Json(json!({"reason": "DEFAULT", "variant": "off"})).into_response(),
        Some("banner-text") => (
            StatusCode::BAD_REQUEST,
            Json(json!({"code": "invalid_argument", "message": "flag type mismatch"})),
        )
            .into_response(),
        Some("broken") => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({"code": "not_found", "message": "flag not found"})),
        )
            .into_response(),
    }
}

async fn start_mock_flagd() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route(RESOLVE_PATH, post(resolve_boolean));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

fn provider_for(addr: SocketAddr) -> FlagdProvider {
    let config = FlagsConfig {
        host: addr.ip().to_string(),
        port: addr.port(),
        timeout_ms: Some(2_000),
        ..FlagsConfig::default()
    };
    FlagdProvider::from_config(&config).unwrap()
}

fn ua(user_agent: &str) -> EvaluationContext {
    EvaluationContext::new().with_attribute("userAgent", user_agent)
}

#[tokio::test]
async fn resolves_targeted_boolean() {
    let provider = provider_for(start_mock_flagd().await);

    assert!(provider.resolve_bool("slow-your-roll", &ua("slowpoke")).await.unwrap());
    assert!(!provider.resolve_bool("slow-your-roll", &ua("curl/8.5.0")).await.unwrap());
    assert_eq!(provider.name(), "flagd");
}

#[tokio::test]
async fn maps_connect_errors() {
    let provider = provider_for(start_mock_flagd().await);
    let ctx = EvaluationContext::new();

    assert!(matches!(
        provider.resolve_bool("missing", &ctx).await,
        Err(FlagError::FlagNotFound(key)) if key == "missing"
    ));
    assert!(matches!(
        provider.resolve_bool("banner-text", &ctx).await,
        Err(FlagError::TypeMismatch(key)) if key == "banner-text"
    ));
    match provider.resolve_bool("broken", &ctx).await {
        Err(FlagError::Provider { code, message }) => {
            assert_eq!(code, "500");
            assert_eq!(message, "boom");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn unreachable_flagd_degrades_to_default() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let provider = provider_for(addr);
    assert!(matches!(
        provider.resolve_bool("slow-your-roll", &EvaluationContext::new()).await,
        Err(FlagError::Transport(_))
    ));

    let client = FlagClient::new(Arc::new(provider));
    assert!(!client.boolean_value("slow-your-roll", false, &EvaluationContext::new()).await);
}

#[tokio::test]
async fn user_agent_targets_the_slow_roll_end_to_end() {
    let provider = provider_for(start_mock_flagd().await);
    let config = test_config();
    let delay = Arc::new(RecordingDelay::default());
    let router = build_router(
        &config,
        build_state(&config, Arc::new(provider), RollMetrics::register(), delay.clone()),
    );

    parse_face(&body_string(get(&router, "/rolldice", Some("curl/8.5.0")).await).await);
    assert!(delay.calls().is_empty());

    parse_face(&body_string(get(&router, "/rolldice", Some("slowpoke")).await).await);
    assert_eq!(delay.calls(), vec![Duration::from_secs(2)]);
}

#[test]
fn explicit_base_url() {
    let provider = FlagdProvider::new(Url::parse("http://flagd:8013/").unwrap(), None).unwrap();
    assert_eq!(
        provider.endpoint().as_str(),
        "http://flagd:8013/flagd.evaluation.v1.Service/ResolveBoolean"
    );
}

//! Integration tests for ScanBrief
//!
//! These drive the public `Analyzer` and the gateway router against a local
//! wiremock server standing in for the provider endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use secrecy::SecretString;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, Request as MockRequest, ResponseTemplate};

use scanbrief::gateway::create_router;
use scanbrief::providers::FAMILY_REGISTRY;
use scanbrief::{AnalysisRequest, Analyzer, Config, ErrorKind, ProviderFamily};

const OPENAI_KEY: &str = "sk-integration-openai-key";
const GITHUB_KEY: &str = "ghp_integration_github_token";

fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    for spec in FAMILY_REGISTRY {
        config.provider_mut(spec.family).api_base = Some(server.uri());
    }
    config.provider_mut(ProviderFamily::OpenAi).api_key = Some(SecretString::from(OPENAI_KEY));
    config.provider_mut(ProviderFamily::GitHub).api_key = Some(SecretString::from(GITHUB_KEY));
    config
}

fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-int",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

fn host_record() -> Value {
    json!({
        "ip": "203.0.113.10",
        "location": {"country": "NL"},
        "services": [
            {"port": 22, "service_name": "SSH", "software": [{"product": "OpenSSH", "version": "7.4"}]},
            {"port": 3389, "service_name": "RDP"}
        ]
    })
}

fn sent_body(requests: &[MockRequest]) -> Value {
    serde_json::from_slice(&requests[0].body).unwrap()
}

// ============================================================================
// Analyzer End-to-End
// ============================================================================

#[tokio::test]
async fn test_default_model_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", format!("Bearer {}", OPENAI_KEY).as_str()))
        .and(body_partial_json(json!({"model": "gpt-4o", "max_tokens": 4000})))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Risk level: HIGH")))
        .expect(1)
        .mount(&server)
        .await;

    let analyzer = Analyzer::from_config(&config_for(&server)).unwrap();
    let report = analyzer
        .analyze(AnalysisRequest::new(host_record()))
        .await
        .unwrap();

    assert_eq!(report.summary, "Risk level: HIGH");
    assert_eq!(report.model_key, "gpt-4o");
    assert_eq!(report.metadata.record_count, 1);
    assert_eq!(report.metadata.data_type, "object");

    let requests = server.received_requests().await.unwrap();
    let body = sent_body(&requests);
    assert_eq!(body["messages"].as_array().unwrap().len(), 2);
    assert_eq!(body["messages"][0]["role"], "system");
    assert!(body["messages"][1]["content"]
        .as_str()
        .unwrap()
        .contains("203.0.113.10"));
    assert!(body["temperature"].is_number());
    assert!(body.get("max_completion_tokens").is_none());
}

#[tokio::test]
async fn test_reasoning_model_request_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("findings")))
        .expect(1)
        .mount(&server)
        .await;

    let analyzer = Analyzer::from_config(&config_for(&server)).unwrap();
    analyzer
        .analyze(AnalysisRequest::new(host_record()).with_model("gpt-5-mini"))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body = sent_body(&requests);
    assert_eq!(body["model"], "gpt-5-mini");
    assert_eq!(body["max_completion_tokens"], 16000);
    assert!(body.get("max_tokens").is_none());
    assert!(body.get("temperature").is_none());
    assert!(body.get("top_p").is_none());
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["role"], "user");
}

#[tokio::test]
async fn test_github_family_routing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", format!("Bearer {}", GITHUB_KEY).as_str()))
        .and(body_partial_json(json!({"model": "openai/o1-mini"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("summary")))
        .expect(1)
        .mount(&server)
        .await;

    let analyzer = Analyzer::from_config(&config_for(&server)).unwrap();
    let report = analyzer
        .analyze(AnalysisRequest::new(json!([host_record(), host_record()])).with_model("github/o1-mini"))
        .await
        .unwrap();

    assert_eq!(report.wire_name, "openai/o1-mini");
    assert_eq!(report.metadata.record_count, 2);
}

#[tokio::test]
async fn test_unauthorized_does_not_leak_credential() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": format!("Incorrect API key provided: {}", OPENAI_KEY)}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let analyzer = Analyzer::from_config(&config_for(&server)).unwrap();
    let err = analyzer
        .analyze(AnalysisRequest::new(host_record()))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Unauthorized);
    assert_eq!(err.provider_status, Some(401));
    assert!(!err.message.contains(OPENAI_KEY));
    assert!(!err.detail.unwrap_or_default().contains(OPENAI_KEY));
}

#[tokio::test]
async fn test_timeout_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("too late"))
                .set_delay(Duration::from_secs(3)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.analysis.timeout_secs = 1;
    let analyzer = Analyzer::from_config(&config).unwrap();

    let err = analyzer
        .analyze(AnalysisRequest::new(host_record()))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Timeout);
}

#[tokio::test]
async fn test_unsupported_model_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("unused")))
        .expect(0)
        .mount(&server)
        .await;

    let analyzer = Analyzer::from_config(&config_for(&server)).unwrap();
    let err = analyzer
        .analyze(AnalysisRequest::new(host_record()).with_model("claude-3"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::UnsupportedModel);
    assert!(err.message.contains("claude-3"));
    assert!(err.message.contains("gpt-4o"));
}

#[tokio::test]
async fn test_truncated_input_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("partial view")))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.provider_mut(ProviderFamily::GitHub).max_input_chars = Some(100);
    let analyzer = Analyzer::from_config(&config).unwrap();

    let hosts: Vec<Value> = (0..50).map(|_| host_record()).collect();
    let report = analyzer
        .analyze(AnalysisRequest::new(Value::Array(hosts)).with_model("Ministral-3B"))
        .await
        .unwrap();

    assert!(report.truncated);
    let requests = server.received_requests().await.unwrap();
    let body = sent_body(&requests);
    assert!(body["messages"][1]["content"]
        .as_str()
        .unwrap()
        .contains("[Data truncated for processing...]"));
}

#[tokio::test]
async fn test_empty_choices_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-empty",
            "object": "chat.completion",
            "choices": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let analyzer = Analyzer::from_config(&config_for(&server)).unwrap();
    let err = analyzer
        .analyze(AnalysisRequest::new(host_record()).with_model("github/gpt-4o-mini"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::MalformedResponse);
    assert_eq!(err.provider_status, Some(200));
    assert!(err.message.contains("GitHub Models"));
}

#[tokio::test]
async fn test_exhausted_quota_keeps_provider_wording() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {
                "message": "You exceeded your current quota, please check your plan and billing details.",
                "type": "insufficient_quota",
                "code": "insufficient_quota"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let analyzer = Analyzer::from_config(&config_for(&server)).unwrap();
    let err = analyzer
        .analyze(AnalysisRequest::new(host_record()))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::RateLimited);
    assert!(err.message.contains("quota exceeded"));
    assert!(err.message.contains("check your account billing"));
    assert!(err.detail.unwrap().contains("current quota"));
}

// ============================================================================
// Gateway
// ============================================================================

#[tokio::test]
async fn test_gateway_summarize_round() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Two exposed hosts")))
        .expect(1)
        .mount(&server)
        .await;

    let analyzer = Arc::new(Analyzer::from_config(&config_for(&server)).unwrap());
    let request = Request::builder()
        .method("POST")
        .uri("/summarize")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({"data": [host_record(), host_record()], "model": "gpt-4o-mini"}).to_string(),
        ))
        .unwrap();

    let response = create_router(analyzer).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["summary"], "Two exposed hosts");
    assert_eq!(body["metadata"]["recordCount"], 2);
    assert_eq!(body["metadata"]["model"], "gpt-4o-mini");
}

#[tokio::test]
async fn test_gateway_rate_limited_maps_to_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"message": "Rate limit reached"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let analyzer = Arc::new(Analyzer::from_config(&config_for(&server)).unwrap());
    let request = Request::builder()
        .method("POST")
        .uri("/summarize")
        .header("content-type", "application/json")
        .body(Body::from(json!({"data": "ssh on 22"}).to_string()))
        .unwrap();

    let response = create_router(analyzer).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["kind"], "rate_limited");
    assert_eq!(body["providerDetails"], "Rate limit reached");
}

#[tokio::test]
async fn test_gateway_quota_detail_reaches_caller() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {
                "message": "You exceeded your current quota, please check your plan and billing details.",
                "code": "insufficient_quota"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let analyzer = Arc::new(Analyzer::from_config(&config_for(&server)).unwrap());
    let request = Request::builder()
        .method("POST")
        .uri("/summarize")
        .header("content-type", "application/json")
        .body(Body::from(json!({"data": "ssh on 22"}).to_string()))
        .unwrap();

    let response = create_router(analyzer).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["details"].as_str().unwrap().contains("quota"));
    assert!(body["providerDetails"]
        .as_str()
        .unwrap()
        .contains("current quota"));
    assert!(!body.to_string().contains(OPENAI_KEY));
}

#[tokio::test]
async fn test_gateway_malformed_response_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("upstream maintenance"))
        .expect(1)
        .mount(&server)
        .await;

    let analyzer = Arc::new(Analyzer::from_config(&config_for(&server)).unwrap());
    let request = Request::builder()
        .method("POST")
        .uri("/summarize")
        .header("content-type", "application/json")
        .body(Body::from(json!({"data": [host_record()]}).to_string()))
        .unwrap();

    let response = create_router(analyzer).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["kind"], "malformed_response");
    assert!(body.get("providerDetails").is_none());
}

#[tokio::test]
async fn test_gateway_blank_data_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("unused")))
        .expect(0)
        .mount(&server)
        .await;

    let analyzer = Arc::new(Analyzer::from_config(&config_for(&server)).unwrap());
    let request = Request::builder()
        .method("POST")
        .uri("/summarize")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"data": ""}"#))
        .unwrap();

    let response = create_router(analyzer).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

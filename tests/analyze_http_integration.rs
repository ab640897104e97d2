//! Integration tests for the check HTTP endpoints.
//!
//! These tests drive the full router (CORS layers, body limit, handlers,
//! analysis pipeline) through `tower::ServiceExt::oneshot`:
//! 1. Input validation happens before any provider call
//! 2. A missing credential is a 500 before any provider exists
//! 3. Provider outcomes map onto the `{success, data|error}` envelope
//! 4. The Gemini adapter sends what the endpoint received

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::extract::State;
use axum::http::{HeaderMap, Method, Request, StatusCode, Uri};
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Value};
use tower::ServiceExt;

use checkvision::adapters::ai::{GeminiConfig, GeminiProvider, MockVisionProvider};
use checkvision::adapters::http::{check_app, CheckAppState};
use checkvision::config::{Environment, GeminiSettings};
use checkvision::domain::check::MAX_UPLOAD_BYTES;
use checkvision::ports::{AIError, VisionProvider};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn app_with(provider: Option<Arc<dyn VisionProvider>>) -> Router {
    check_app(CheckAppState::new(provider, Environment::Development))
}

fn app_with_mock(mock: &MockVisionProvider) -> Router {
    app_with(Some(Arc::new(mock.clone())))
}

fn image_b64() -> String {
    STANDARD.encode(b"\x89PNG\r\n\x1a\nnot really a png")
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn analyze_request(image_data: &str, mime_type: &str) -> Request<Body> {
    post_json(
        "/analyze",
        json!({"imageData": image_data, "mimeType": mime_type}),
    )
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, body)
}

fn assert_failure(body: &Value, message: &str) {
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!(message));
}

const UNTOUCHED_FIELDS: &[&str] = &[
    "accountHolder",
    "accountNumber",
    "routingNumber",
    "ifscCode",
    "micrCode",
    "checkNumber",
    "date",
    "amountNumbers",
    "amountWords",
    "memo",
    "address",
];

// =============================================================================
// Validation and configuration
// =============================================================================

#[tokio::test]
async fn missing_credential_returns_configuration_error() {
    let (status, headers, body) =
        send(app_with(None), analyze_request(&image_b64(), "image/png")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_failure(&body, "Server configuration error. API key not found.");
}

#[tokio::test]
async fn missing_mime_type_is_bad_request() {
    let mock = MockVisionProvider::new();
    let (status, _, body) = send(
        app_with_mock(&mock),
        post_json("/analyze", json!({"imageData": image_b64()})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_failure(&body, "Missing required fields: imageData and mimeType");
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn missing_fields_checked_before_credential() {
    let (status, _, body) = send(app_with(None), post_json("/analyze", json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_failure(&body, "Missing required fields: imageData and mimeType");
}

#[tokio::test]
async fn unsupported_media_type_rejected_before_call() {
    let mock = MockVisionProvider::new();
    let (status, _, body) =
        send(app_with_mock(&mock), analyze_request(&image_b64(), "image/gif")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("image/gif"));
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn oversized_payload_rejected_before_call() {
    let mock = MockVisionProvider::new();
    let oversized = STANDARD.encode(vec![0u8; MAX_UPLOAD_BYTES + 1]);

    let (status, _, body) =
        send(app_with_mock(&mock), analyze_request(&oversized, "image/jpeg")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("smaller than 10MB"));
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn invalid_base64_rejected_before_call() {
    let mock = MockVisionProvider::new();
    let (status, _, body) =
        send(app_with_mock(&mock), analyze_request("not base64!!", "image/png")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(mock.call_count(), 0);
}

// =============================================================================
// CORS and methods
// =============================================================================

#[tokio::test]
async fn options_analyze_returns_cors_headers_and_empty_body() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/analyze")
        .body(Body::empty())
        .unwrap();

    let (status, headers, body) = send(app_with(None), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "POST, OPTIONS");
    assert_eq!(headers["access-control-allow-headers"], "Content-Type");
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn put_analyze_is_method_not_allowed() {
    let request = Request::builder()
        .method(Method::PUT)
        .uri("/api/analyze")
        .body(Body::empty())
        .unwrap();

    let (status, headers, body) = send(app_with(None), request).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(headers["access-control-allow-methods"], "POST, OPTIONS");
    assert_failure(&body, "Method not allowed. Only POST requests are supported.");
}

#[tokio::test]
async fn options_health_returns_cors_headers_and_empty_body() {
    for uri in ["/health", "/api/test"] {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let (status, headers, body) = send(app_with(None), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(headers["access-control-allow-methods"], "GET, POST, OPTIONS");
        assert_eq!(headers["access-control-allow-headers"], "Content-Type");
        assert_eq!(body, Value::Null);
    }
}

#[tokio::test]
async fn health_reports_configured_key_without_value() {
    let mock = MockVisionProvider::new();
    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, headers, body) = send(app_with_mock(&mock), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["access-control-allow-methods"], "GET, POST, OPTIONS");
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("CheckVision API is running successfully"));
    assert_eq!(body["apiKeyConfigured"], json!(true));
    assert_eq!(body["version"], json!("2.0.0"));
    assert!(body.get("apiKey").is_none());
}

// =============================================================================
// Provider outcomes
// =============================================================================

#[tokio::test]
async fn fenced_response_yields_record_with_sentinels() {
    let mock = MockVisionProvider::new()
        .with_response("Here you go:\n```json\n{\"bankName\": \"X\"}\n```\nDone.");

    let (status, _, body) =
        send(app_with_mock(&mock), analyze_request(&image_b64(), "image/png")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    let data = &body["data"];
    assert_eq!(data["bankName"], json!("X"));
    assert_eq!(data["signatureStatus"], json!("Not detected"));
    for field in UNTOUCHED_FIELDS {
        assert_eq!(data[*field], json!("Not found"), "field {field}");
    }
    assert_eq!(data["extractionConfidence"], json!(95));
    assert!(data["processingTime"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn provider_receives_uploaded_image_once() {
    let mock = MockVisionProvider::new().with_response(r#"{"checkNumber": "1001"}"#);
    let image = image_b64();

    let (status, _, body) = send(app_with_mock(&mock), analyze_request(&image, "image/png")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["checkNumber"], json!("1001"));

    let calls = mock.get_calls();
    assert_eq!(calls.len(), 1);
    let sent = calls[0].image.as_ref().unwrap();
    assert_eq!(sent.mime_type, "image/png");
    assert_eq!(sent.data, image);
    assert!(calls[0].prompt.contains("\"accountHolder\""));
}

#[tokio::test]
async fn last_brace_object_wins() {
    let mock = MockVisionProvider::new()
        .with_response(r#"first {"bankName": "A"} then {"bankName": "B"}"#);

    let (_, _, body) =
        send(app_with_mock(&mock), analyze_request(&image_b64(), "image/png")).await;

    assert_eq!(body["data"]["bankName"], json!("B"));
}

#[tokio::test]
async fn unparseable_response_is_failure_envelope() {
    let mock = MockVisionProvider::new().with_response("I cannot read this check, sorry.");

    let (status, _, body) =
        send(app_with_mock(&mock), analyze_request(&image_b64(), "image/png")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_failure(&body, "Failed to parse AI response");
}

#[tokio::test]
async fn empty_response_is_failure_envelope() {
    let mock = MockVisionProvider::new().with_empty_response();

    let (status, _, body) =
        send(app_with_mock(&mock), analyze_request(&image_b64(), "image/png")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_failure(&body, "No response generated from the AI service");
}

#[tokio::test]
async fn service_error_message_is_propagated() {
    let mock =
        MockVisionProvider::new().with_error(AIError::service(429, "Resource has been exhausted"));

    let (status, _, body) =
        send(app_with_mock(&mock), analyze_request(&image_b64(), "image/png")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_failure(&body, "AI service error: Resource has been exhausted");
    assert_eq!(mock.call_count(), 1);
}

// =============================================================================
// End to end through the Gemini adapter
// =============================================================================

#[derive(Debug, Clone)]
struct Captured {
    path: String,
    api_key: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct Stub {
    status: StatusCode,
    body: Value,
    delay: Duration,
    seen: Arc<Mutex<Vec<Captured>>>,
}

async fn stub_handler(
    State(stub): State<Stub>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    stub.seen.lock().unwrap().push(Captured {
        path: uri.path().to_string(),
        api_key: headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        body,
    });
    if !stub.delay.is_zero() {
        tokio::time::sleep(stub.delay).await;
    }
    (stub.status, Json(stub.body))
}

async fn spawn_gemini_stub(status: StatusCode, body: Value) -> (String, Arc<Mutex<Vec<Captured>>>) {
    spawn_slow_gemini_stub(Duration::ZERO, status, body).await
}

async fn spawn_slow_gemini_stub(
    delay: Duration,
    status: StatusCode,
    body: Value,
) -> (String, Arc<Mutex<Vec<Captured>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let stub = Stub {
        status,
        body,
        delay,
        seen: seen.clone(),
    };
    let app = Router::new().fallback(stub_handler).with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/v1beta", addr), seen)
}

fn gemini_app(base_url: &str) -> Router {
    let provider = GeminiProvider::new(
        GeminiConfig::new("integration-key").with_base_url(base_url),
    )
    .unwrap();
    app_with(Some(Arc::new(provider)))
}

#[tokio::test]
async fn gemini_round_trip_forwards_image_and_key() {
    let (base_url, seen) = spawn_gemini_stub(
        StatusCode::OK,
        json!({
            "candidates": [{
                "content": {"parts": [{"text": "{\"accountHolder\": \"Jane Doe\", \"signatureStatus\": \"Present\"}"}]},
                "finishReason": "STOP"
            }],
            "modelVersion": "gemini-1.5-flash"
        }),
    )
    .await;
    let image = image_b64();

    let (status, _, body) = send(gemini_app(&base_url), analyze_request(&image, "image/png")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["accountHolder"], json!("Jane Doe"));
    assert_eq!(body["data"]["signatureStatus"], json!("Present"));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].path, "/v1beta/models/gemini-1.5-flash:generateContent");
    assert_eq!(seen[0].api_key.as_deref(), Some("integration-key"));
    let parts = &seen[0].body["contents"][0]["parts"];
    assert_eq!(parts[1]["inline_data"]["mime_type"], json!("image/png"));
    assert_eq!(parts[1]["inline_data"]["data"], json!(image));
}

#[tokio::test]
async fn gemini_error_without_message_uses_generic_text() {
    let (base_url, _) = spawn_gemini_stub(StatusCode::BAD_GATEWAY, json!({})).await;

    let (status, _, body) =
        send(gemini_app(&base_url), analyze_request(&image_b64(), "image/png")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_failure(&body, "AI service error: Analysis failed");
}

#[tokio::test]
async fn gemini_empty_candidates_is_empty_response() {
    let (base_url, _) = spawn_gemini_stub(StatusCode::OK, json!({"candidates": []})).await;

    let (status, _, body) =
        send(gemini_app(&base_url), analyze_request(&image_b64(), "image/png")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_failure(&body, "No response generated from the AI service");
}

#[tokio::test]
async fn gemini_null_levels_are_empty_response() {
    for envelope in [
        json!({"candidates": null}),
        json!({"candidates": [{"content": {"parts": null}}]}),
        json!({"candidates": [{"content": {"parts": [{"text": null}]}}]}),
    ] {
        let (base_url, _) = spawn_gemini_stub(StatusCode::OK, envelope).await;

        let (status, _, body) =
            send(gemini_app(&base_url), analyze_request(&image_b64(), "image/png")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_failure(&body, "No response generated from the AI service");
    }
}

#[tokio::test]
async fn configured_timeout_surfaces_as_service_error() {
    let (base_url, seen) = spawn_slow_gemini_stub(
        Duration::from_secs(3),
        StatusCode::OK,
        json!({"candidates": [{"content": {"parts": [{"text": "{}"}]}}]}),
    )
    .await;
    let settings = GeminiSettings {
        api_key: Some(secrecy::Secret::new("integration-key".to_string())),
        base_url,
        timeout_secs: Some(1),
        ..GeminiSettings::default()
    };
    let provider = GeminiProvider::new(settings.provider_config().unwrap()).unwrap();

    let (status, _, body) = send(
        app_with(Some(Arc::new(provider))),
        analyze_request(&image_b64(), "image/png"),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_failure(&body, "AI service error: request timed out after 1s");
    assert_eq!(seen.lock().unwrap().len(), 1);
}

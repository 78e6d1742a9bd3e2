//! End-to-end router behavior against a scripted upstream.

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, StatusCode, header};
use axum::routing::post;
use axum::{Json, Router};
use chrono::{Duration, TimeZone, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use vocetta_core::{Clock, MockClock};
use vocetta_quota::QuotaTracker;
use vocetta_rate_limit::{RateLimitConfig, RateLimiter};
use vocetta_server::{AppState, ErrorEnvelope, create_router};
use vocetta_synthesis::{SynthesisClient, SynthesisConfig};

/// A 36-character sentence, URL-encoded for the query string.
const GENERATE_URI: &str =
    "/api/generate?input=The%20quick%20brown%20fox%20jumps%20over%20the%20lazy%20dog.&voice=alloy";

/// Upstream double serving a scripted sequence of responses.
///
/// Responses are served in order; the last entry repeats. Every request
/// body and header set is recorded for inspection.
#[derive(Clone)]
struct FakeUpstream {
    script: Arc<Mutex<VecDeque<(u16, &'static str)>>>,
    requests: Arc<Mutex<Vec<(HeaderMap, Value)>>>,
}

impl FakeUpstream {
    fn scripted(responses: impl IntoIterator<Item = (u16, &'static str)>) -> Self {
        Self {
            script: Arc::new(Mutex::new(responses.into_iter().collect())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn recorded(&self, index: usize) -> (HeaderMap, Value) {
        self.requests.lock().unwrap()[index].clone()
    }
}

async fn speech(
    State(upstream): State<FakeUpstream>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Vec<u8>) {
    upstream.requests.lock().unwrap().push((headers, body));

    let (status, body) = {
        let mut script = upstream.script.lock().unwrap();
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            *script.front().expect("script must not be empty")
        }
    };

    (
        StatusCode::from_u16(status).unwrap(),
        body.as_bytes().to_vec(),
    )
}

async fn spawn_upstream(upstream: FakeUpstream) -> String {
    let app = Router::new()
        .route("/v1/audio/speech", post(speech))
        .with_state(upstream);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/v1/audio/speech", addr)
}

/// Gateway state wired to the scripted upstream, on a frozen clock.
///
/// Limiters carry the conventional 10/min and 50/min limits; the
/// synthesis client retries twice with 5ms delays.
fn test_state(url: &str, quota_enabled: bool) -> (AppState, MockClock) {
    let clock = MockClock::new(
        Utc.with_ymd_and_hms(2026, 8, 23, 0, 0, 0)
            .single()
            .unwrap(),
    );
    let shared: Arc<dyn Clock> = Arc::new(clock.clone());

    let state = AppState::new(
        Arc::new(RateLimiter::with_clock(
            RateLimitConfig::per_ip(),
            Arc::clone(&shared),
        )),
        Arc::new(RateLimiter::with_clock(
            RateLimitConfig::per_user(),
            Arc::clone(&shared),
        )),
        Arc::new(QuotaTracker::with_clock(quota_enabled, Arc::clone(&shared))),
        Arc::new(SynthesisClient::with_api_key(
            SynthesisConfig::new(url, "gpt-4o-mini-tts", 2, 5),
            Some("sk-test".to_string()),
        )),
    );

    (state, clock)
}

fn generate_request(forwarded_for: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(GENERATE_URI)
        .header("x-forwarded-for", forwarded_for)
        .body(Body::empty())
        .unwrap()
}

async fn read_bytes(response: axum::response::Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

async fn read_envelope(response: axum::response::Response) -> ErrorEnvelope {
    serde_json::from_slice(&read_bytes(response).await).unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    serde_json::from_slice(&read_bytes(response).await).unwrap()
}

#[tokio::test]
async fn streams_audio_with_derived_headers() {
    let upstream = FakeUpstream::scripted([(200, "fake audio bytes")]);
    let url = spawn_upstream(upstream.clone()).await;
    let (state, _clock) = test_state(&url, false);
    let router = create_router(state);

    let response = router.oneshot(generate_request("198.51.100.1")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "audio/mpeg");
    let disposition = headers
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(disposition.starts_with("inline; filename=\"tts-alloy-"));
    assert!(disposition.ends_with(".mp3\""));
    assert_eq!(headers.get(header::CACHE_CONTROL).unwrap(), "no-cache");
    assert_eq!(headers.get("x-character-count").unwrap(), "36");
    assert_eq!(headers.get("x-language").unwrap(), "en");

    let cookie = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.starts_with("tts_user_id="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));

    assert_eq!(read_bytes(response).await, b"fake audio bytes");
}

#[tokio::test]
async fn returning_cookie_is_not_reissued() {
    let upstream = FakeUpstream::scripted([(200, "fake audio bytes")]);
    let url = spawn_upstream(upstream.clone()).await;
    let (state, _clock) = test_state(&url, false);
    let router = create_router(state);

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(GENERATE_URI)
                .header("x-forwarded-for", "198.51.100.1")
                .header(header::COOKIE, "tts_user_id=returning-user")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn form_post_forwards_instructions() {
    let upstream = FakeUpstream::scripted([(200, "fake audio bytes")]);
    let url = spawn_upstream(upstream.clone()).await;
    let (state, _clock) = test_state(&url, false);
    let router = create_router(state);

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/generate")
                .header("x-forwarded-for", "198.51.100.1")
                .header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(Body::from(
                    "input=A%20perfectly%20ordinary%20request.&voice=coral&prompt=Whisper%20gently",
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let (_, body) = upstream.recorded(0);
    assert_eq!(body["voice"], "coral");
    assert_eq!(body["input"], "A perfectly ordinary request.");
    assert_eq!(body["instructions"], "Whisper gently");
}

#[tokio::test]
async fn rejects_invalid_input_before_any_upstream_call() {
    let upstream = FakeUpstream::scripted([(200, "never served")]);
    let url = spawn_upstream(upstream.clone()).await;
    let (state, _clock) = test_state(&url, false);
    let router = create_router(state);

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/generate?input=short&voice=alloy")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(upstream.request_count(), 0);

    let envelope = read_envelope(response).await;
    assert_eq!(envelope.error.code, "TEXT_TOO_SHORT");
    assert_eq!(envelope.error.status_code, 400);
    assert_eq!(
        envelope.error.message,
        "Text must be at least 10 characters long"
    );
}

#[tokio::test]
async fn address_limit_denies_the_eleventh_request() {
    let upstream = FakeUpstream::scripted([(200, "fake audio bytes")]);
    let url = spawn_upstream(upstream.clone()).await;
    let (state, clock) = test_state(&url, false);
    let router = create_router(state);

    for _ in 0..10 {
        let response = router
            .clone()
            .oneshot(generate_request("203.0.113.7"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = router
        .clone()
        .oneshot(generate_request("203.0.113.7"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "60");
    assert_eq!(upstream.request_count(), 10);

    let envelope = read_envelope(response).await;
    assert_eq!(envelope.error.code, "RATE_LIMIT_ERROR");
    assert_eq!(envelope.error.status_code, 429);
    assert_eq!(
        envelope.error.message,
        "Too many requests. Please try again in 60 seconds."
    );

    // A different address is not affected.
    let response = router
        .clone()
        .oneshot(generate_request("203.0.113.8"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The window lapses and the address is re-admitted.
    clock.advance(Duration::seconds(61));
    let response = router
        .oneshot(generate_request("203.0.113.7"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn user_limit_binds_the_cookie_identity_across_addresses() {
    let upstream = FakeUpstream::scripted([(200, "fake audio bytes")]);
    let url = spawn_upstream(upstream.clone()).await;
    let (state, _clock) = test_state(&url, false);
    let router = create_router(state);

    for i in 0..50 {
        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(GENERATE_URI)
                    .header("x-forwarded-for", format!("10.0.0.{}", i))
                    .header(header::COOKIE, "tts_user_id=test-user")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(GENERATE_URI)
                .header("x-forwarded-for", "10.0.3.99")
                .header(header::COOKIE, "tts_user_id=test-user")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let envelope = read_envelope(response).await;
    assert_eq!(envelope.error.code, "RATE_LIMIT_ERROR");
}

#[tokio::test]
async fn quota_exhaustion_returns_the_payment_envelope() {
    let upstream = FakeUpstream::scripted([(200, "never served")]);
    let url = spawn_upstream(upstream.clone()).await;
    let (state, _clock) = test_state(&url, true);
    state.quota().consume("quota-user", 9_990);
    let router = create_router(state.clone());

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(GENERATE_URI)
                .header(header::COOKIE, "tts_user_id=quota-user")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(upstream.request_count(), 0);

    let envelope = read_envelope(response).await;
    assert_eq!(envelope.error.code, "QUOTA_EXCEEDED");
    assert_eq!(envelope.error.status_code, 403);
    assert_eq!(
        envelope.error.message,
        "Monthly character limit reached. You have 10 characters remaining. Upgrade to continue."
    );

    // The denied request billed nothing.
    assert_eq!(*state.quota().snapshot("quota-user").characters_used(), 9_990);
}

#[tokio::test]
async fn successful_generation_bills_the_quota() {
    let upstream = FakeUpstream::scripted([(200, "fake audio bytes")]);
    let url = spawn_upstream(upstream.clone()).await;
    let (state, _clock) = test_state(&url, true);
    let router = create_router(state.clone());

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(GENERATE_URI)
                .header(header::COOKIE, "tts_user_id=billed-user")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_bytes(response).await, b"fake audio bytes");

    let snapshot = state.quota().snapshot("billed-user");
    assert_eq!(*snapshot.characters_used(), 36);
    assert_eq!(*snapshot.remaining(), 9_964);
}

#[tokio::test]
async fn failed_synthesis_bills_nothing() {
    let upstream = FakeUpstream::scripted([(500, "boom")]);
    let url = spawn_upstream(upstream.clone()).await;
    let (state, _clock) = test_state(&url, true);
    let router = create_router(state.clone());

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(GENERATE_URI)
                .header(header::COOKIE, "tts_user_id=unlucky-user")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(*state.quota().snapshot("unlucky-user").characters_used(), 0);
}

#[tokio::test]
async fn usage_endpoint_reports_the_ledger() {
    let upstream = FakeUpstream::scripted([(200, "unused")]);
    let url = spawn_upstream(upstream.clone()).await;
    let (state, _clock) = test_state(&url, true);
    state.quota().consume("quota-user", 2_500);
    let router = create_router(state);

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/usage")
                .header(header::COOKIE, "tts_user_id=quota-user")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    let v = read_json(response).await;
    assert_eq!(v["enabled"], true);
    assert_eq!(v["usage"]["tier"], "free");
    assert_eq!(v["usage"]["charactersUsed"], 2_500);
    assert_eq!(v["usage"]["limit"], 10_000);
    assert_eq!(v["usage"]["remaining"], 7_500);
    assert_eq!(v["usage"]["usageRatio"], 0.25);
    assert_eq!(v["usage"]["daysUntilReset"], 9);
    assert!(v["usage"]["resetAt"].is_string());
}

#[tokio::test]
async fn usage_mints_an_identity_for_new_callers() {
    let upstream = FakeUpstream::scripted([(200, "unused")]);
    let url = spawn_upstream(upstream.clone()).await;
    let (state, _clock) = test_state(&url, false);
    let router = create_router(state);

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/usage")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("tts_user_id="));

    let v = read_json(response).await;
    assert_eq!(v["enabled"], false);
    assert_eq!(v["usage"]["charactersUsed"], 0);
}

#[tokio::test]
async fn upstream_failures_surface_the_retry_exhausted_envelope() {
    let upstream = FakeUpstream::scripted([(500, "boom")]);
    let url = spawn_upstream(upstream.clone()).await;
    let (state, _clock) = test_state(&url, false);
    let router = create_router(state);

    let response = router.oneshot(generate_request("198.51.100.1")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    // The first attempt plus two retries.
    assert_eq!(upstream.request_count(), 3);

    let envelope = read_envelope(response).await;
    assert_eq!(envelope.error.code, "UPSTREAM_ERROR");
    assert_eq!(
        envelope.error.message,
        "Failed to generate speech after multiple attempts"
    );
}

#[tokio::test]
async fn provider_rejections_keep_status_and_message() {
    let upstream = FakeUpstream::scripted([(400, "Invalid voice parameter")]);
    let url = spawn_upstream(upstream.clone()).await;
    let (state, _clock) = test_state(&url, false);
    let router = create_router(state);

    let response = router.oneshot(generate_request("198.51.100.1")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(upstream.request_count(), 1);

    let envelope = read_envelope(response).await;
    assert_eq!(envelope.error.code, "UPSTREAM_ERROR");
    assert_eq!(
        envelope.error.message,
        "Speech API error: Invalid voice parameter"
    );
}

#[tokio::test]
async fn missing_key_reports_service_unavailable() {
    let upstream = FakeUpstream::scripted([(200, "never served")]);
    let url = spawn_upstream(upstream.clone()).await;
    let (state, _clock) = test_state(&url, false);
    let state = AppState::new(
        Arc::clone(state.ip_limiter()),
        Arc::clone(state.user_limiter()),
        Arc::clone(state.quota()),
        Arc::new(SynthesisClient::with_api_key(
            SynthesisConfig::new(&url, "gpt-4o-mini-tts", 2, 5),
            None,
        )),
    );
    let router = create_router(state);

    let response = router.oneshot(generate_request("198.51.100.1")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(upstream.request_count(), 0);

    let envelope = read_envelope(response).await;
    assert_eq!(envelope.error.message, "Speech service is not configured");
}

#[tokio::test]
async fn health_reports_ok_without_touching_admission() {
    let upstream = FakeUpstream::scripted([(200, "probe audio")]);
    let url = spawn_upstream(upstream.clone()).await;
    let (state, _clock) = test_state(&url, false);
    let router = create_router(state.clone());

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(upstream.request_count(), 1);

    let v = read_json(response).await;
    assert_eq!(v["status"], "ok");
    assert_eq!(v["services"]["upstream"], "ok");
    assert!(v["timestamp"].as_i64().unwrap() > 0);

    // The probe consumed no one's allowance.
    assert!(state.ip_limiter().is_empty());
    assert!(state.user_limiter().is_empty());
}

#[tokio::test]
async fn health_degrades_when_the_provider_is_down() {
    let upstream = FakeUpstream::scripted([(500, "down")]);
    let url = spawn_upstream(upstream.clone()).await;
    let (state, _clock) = test_state(&url, false);
    let router = create_router(state);

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    // A single probe, no retries.
    assert_eq!(upstream.request_count(), 1);

    let v = read_json(response).await;
    assert_eq!(v["status"], "degraded");
    assert_eq!(v["services"]["upstream"], "down");
}

//! Client behavior against a scripted local upstream.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use futures::StreamExt;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use vocetta_core::{validate, SpeechParams, ValidatedRequest};
use vocetta_error::SynthesisErrorKind;
use vocetta_synthesis::{SpeechAudio, SynthesisClient, SynthesisConfig};

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

/// Client pointed at the scripted upstream, with short retry delays.
fn client_for(url: &str) -> SynthesisClient {
    let config = SynthesisConfig::new(url, "gpt-4o-mini-tts", 2, 5);
    SynthesisClient::with_api_key(config, Some("sk-test".to_string()))
}

fn request_for(text: &str) -> ValidatedRequest {
    let params = SpeechParams {
        input: Some(text.to_string()),
        voice: Some("alloy".to_string()),
        ..Default::default()
    };
    validate(&params).unwrap()
}

async fn collect(audio: SpeechAudio) -> Vec<u8> {
    let mut stream = audio.stream;
    let mut bytes = Vec::new();
    while let Some(chunk) = stream.next().await {
        bytes.extend_from_slice(&chunk.unwrap());
    }
    bytes
}

#[tokio::test]
async fn payload_matches_the_provider_contract() {
    let upstream = FakeUpstream::scripted([(200, "fake audio bytes")]);
    let url = spawn_upstream(upstream.clone()).await;
    let client = client_for(&url);

    let params = SpeechParams {
        input: Some("The quick brown fox jumps over the lazy dog.".to_string()),
        voice: Some("nova".to_string()),
        speed: Some("1.5".to_string()),
        format: Some("wav".to_string()),
        instructions: Some("Speak slowly please".to_string()),
    };
    let request = validate(&params).unwrap();

    let audio = client.generate(&request).await.unwrap();
    assert_eq!(audio.content_type, "audio/wav");
    assert!(audio.filename.starts_with("tts-nova-"));
    assert!(audio.filename.ends_with(".wav"));
    assert_eq!(collect(audio).await, b"fake audio bytes");

    let (headers, body) = upstream.recorded(0);
    assert_eq!(
        headers.get("authorization").unwrap().to_str().unwrap(),
        "Bearer sk-test"
    );
    assert_eq!(body["model"], "gpt-4o-mini-tts");
    assert_eq!(
        body["input"],
        "The quick brown fox jumps over the lazy dog."
    );
    assert_eq!(body["voice"], "nova");
    assert_eq!(body["response_format"], "wav");
    assert_eq!(body["speed"], 1.5);
    assert_eq!(body["instructions"], "Speak slowly please");
}

#[tokio::test]
async fn instructions_omitted_when_absent() {
    let upstream = FakeUpstream::scripted([(200, "fake audio bytes")]);
    let url = spawn_upstream(upstream.clone()).await;
    let client = client_for(&url);

    client
        .generate(&request_for("A perfectly ordinary request."))
        .await
        .unwrap();

    let (_, body) = upstream.recorded(0);
    assert!(body.get("instructions").is_none());
    assert_eq!(body["speed"], 1.0);
    assert_eq!(body["response_format"], "mp3");
}

#[tokio::test]
async fn provider_client_errors_fail_without_retry() {
    let upstream = FakeUpstream::scripted([(400, "Invalid voice parameter")]);
    let url = spawn_upstream(upstream.clone()).await;
    let client = client_for(&url);

    let err = client
        .generate(&request_for("A perfectly ordinary request."))
        .await
        .unwrap_err();

    assert_eq!(upstream.request_count(), 1);
    assert_eq!(err.http_status(), 400);
    assert_eq!(
        err.public_message(),
        "Speech API error: Invalid voice parameter"
    );
}

#[tokio::test]
async fn server_errors_retried_until_success() {
    let upstream = FakeUpstream::scripted([(503, "overloaded"), (503, "overloaded"), (200, "audio!")]);
    let url = spawn_upstream(upstream.clone()).await;
    let client = client_for(&url);

    let audio = client
        .generate(&request_for("A perfectly ordinary request."))
        .await
        .unwrap();

    assert_eq!(upstream.request_count(), 3);
    assert_eq!(collect(audio).await, b"audio!");
}

#[tokio::test]
async fn retry_delays_grow_linearly() {
    let upstream =
        FakeUpstream::scripted([(503, "overloaded"), (503, "overloaded"), (200, "audio!")]);
    let url = spawn_upstream(upstream.clone()).await;
    let config = SynthesisConfig::new(&url, "gpt-4o-mini-tts", 2, 100);
    let client = SynthesisClient::with_api_key(config, Some("sk-test".to_string()));

    let started = std::time::Instant::now();
    client
        .generate(&request_for("A perfectly ordinary request."))
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert_eq!(upstream.request_count(), 3);
    // The first retry waits base, the second 2x base; a constant schedule
    // would finish well under the combined 300ms.
    assert!(
        elapsed >= std::time::Duration::from_millis(300),
        "expected at least 300ms of backoff, got {:?}",
        elapsed
    );
}

#[tokio::test]
async fn gives_up_after_exhausting_retries() {
    let upstream = FakeUpstream::scripted([(500, "boom")]);
    let url = spawn_upstream(upstream.clone()).await;
    let client = client_for(&url);

    let err = client
        .generate(&request_for("A perfectly ordinary request."))
        .await
        .unwrap_err();

    // Two retries on top of the first attempt.
    assert_eq!(upstream.request_count(), 3);
    assert_eq!(err.http_status(), 500);
    assert_eq!(
        err.public_message(),
        "Failed to generate speech after multiple attempts"
    );
}

#[tokio::test]
async fn empty_success_body_is_retried() {
    let upstream = FakeUpstream::scripted([(200, ""), (200, "late audio")]);
    let url = spawn_upstream(upstream.clone()).await;
    let client = client_for(&url);

    let audio = client
        .generate(&request_for("A perfectly ordinary request."))
        .await
        .unwrap();

    assert_eq!(upstream.request_count(), 2);
    assert_eq!(collect(audio).await, b"late audio");
}

#[tokio::test]
async fn missing_api_key_reports_unconfigured() {
    let upstream = FakeUpstream::scripted([(200, "never served")]);
    let url = spawn_upstream(upstream.clone()).await;
    let config = SynthesisConfig::new(&url, "gpt-4o-mini-tts", 2, 5);
    let client = SynthesisClient::with_api_key(config, None);

    assert!(!client.is_configured());

    let err = client
        .generate(&request_for("A perfectly ordinary request."))
        .await
        .unwrap_err();

    assert_eq!(upstream.request_count(), 0);
    assert_eq!(err.kind, SynthesisErrorKind::MissingApiKey);
    assert_eq!(err.http_status(), 503);
    assert_eq!(err.public_message(), "Speech service is not configured");
}

#[tokio::test]
async fn health_check_probes_once_without_retry() {
    let healthy = FakeUpstream::scripted([(200, "probe audio")]);
    let url = spawn_upstream(healthy.clone()).await;
    assert!(client_for(&url).health_check().await.is_ok());
    assert_eq!(healthy.request_count(), 1);

    let (_, body) = healthy.recorded(0);
    assert_eq!(body["input"], "test");
    assert_eq!(body["voice"], "alloy");
    assert_eq!(body["response_format"], "mp3");
    assert_eq!(body["speed"], 1.0);

    let failing = FakeUpstream::scripted([(500, "down")]);
    let url = spawn_upstream(failing.clone()).await;
    assert!(client_for(&url).health_check().await.is_err());
    assert_eq!(failing.request_count(), 1);
}

//! Route definitions and request orchestration.

use crate::identity;
use crate::response::ApiError;
use crate::state::AppState;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header};
use axum::response::{AppendHeaders, IntoResponse, Response};
use axum::routing::get;
use axum::{Form, Json, Router};
use chrono::Utc;
use serde_json::json;
use tracing::{info, instrument, warn};
use vocetta_core::{SpeechParams, ValidatedRequest, validate};
use vocetta_error::VocettaResult;
use vocetta_synthesis::SpeechAudio;

/// Build the gateway router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/generate", get(generate_get).post(generate_post))
        .route("/api/health", get(health))
        .route("/api/usage", get(usage))
        .with_state(state)
}

/// Query-string variant of the generate endpoint, for direct links.
async fn generate_get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SpeechParams>,
) -> Response {
    handle_generate(state, headers, params).await
}

/// Form-encoded variant of the generate endpoint, for browser forms.
async fn generate_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(params): Form<SpeechParams>,
) -> Response {
    handle_generate(state, headers, params).await
}

async fn handle_generate(state: AppState, headers: HeaderMap, params: SpeechParams) -> Response {
    let client_ip = identity::client_ip(&headers);
    let (user_id, minted) = identity::user_identity(&headers);

    let mut response = match run_pipeline(&state, &client_ip, &user_id, &params).await {
        Ok((audio, request)) => audio_response(audio, &request),
        Err(e) => ApiError::from(e).into_response(),
    };

    if minted {
        attach_user_cookie(&mut response, &user_id);
    }

    response
}

/// The admission-and-synthesis pipeline, in fixed order.
///
/// Address limit, then user limit, then validation, then the quota
/// check; synthesis runs only for fully admitted requests, and quota is
/// billed only after the provider has answered successfully.
#[instrument(skip_all, fields(client_ip = %client_ip, identity = %user_id))]
async fn run_pipeline(
    state: &AppState,
    client_ip: &str,
    user_id: &str,
    params: &SpeechParams,
) -> VocettaResult<(SpeechAudio, ValidatedRequest)> {
    state.ip_limiter().check(client_ip)?;
    state.user_limiter().check(user_id)?;

    let request = validate(params)?;

    state.quota().check(user_id, *request.character_count())?;
    let audio = state.synthesis().generate(&request).await?;
    state.quota().consume(user_id, *request.character_count());

    info!(
        identity = %user_id,
        client_ip = %client_ip,
        voice = %request.voice(),
        characters = *request.character_count(),
        language = request.language().as_str(),
        "speech generated"
    );

    Ok((audio, request))
}

/// Stream the audio back with the derived metadata headers.
fn audio_response(audio: SpeechAudio, request: &ValidatedRequest) -> Response {
    (
        StatusCode::OK,
        AppendHeaders([
            (header::CONTENT_TYPE, audio.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", audio.filename),
            ),
            (header::CACHE_CONTROL, "no-cache".to_string()),
            (
                HeaderName::from_static("x-character-count"),
                request.character_count().to_string(),
            ),
            (
                HeaderName::from_static("x-language"),
                request.language().as_str().to_string(),
            ),
        ]),
        Body::from_stream(audio.stream),
    )
        .into_response()
}

fn attach_user_cookie(response: &mut Response, user_id: &str) {
    if let Ok(value) = HeaderValue::from_str(&identity::user_cookie(user_id)) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
}

/// Upstream health probe. Never touches the admission components, so a
/// monitoring loop cannot eat into anyone's allowance.
async fn health(State(state): State<AppState>) -> Response {
    match state.synthesis().health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": Utc::now().timestamp_millis(),
                "services": { "upstream": "ok" },
            })),
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, "upstream health probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": Utc::now().timestamp_millis(),
                    "services": { "upstream": "down" },
                })),
            )
                .into_response()
        }
    }
}

/// The caller's quota standing.
async fn usage(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let (user_id, minted) = identity::user_identity(&headers);
    let snapshot = state.quota().snapshot(&user_id);

    let mut response = (
        StatusCode::OK,
        Json(json!({
            "enabled": state.quota().enabled(),
            "usage": snapshot,
        })),
    )
        .into_response();

    if minted {
        attach_user_cookie(&mut response, &user_id);
    }

    response
}

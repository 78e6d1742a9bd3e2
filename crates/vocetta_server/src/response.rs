//! Wire envelope for pipeline failures.

use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::error;
use vocetta_error::{VocettaError, VocettaErrorKind};

/// Body of every error response: `{"error": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// The failure description
    pub error: ErrorBody,
}

/// Machine-readable failure description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Human-readable message safe to show end users
    pub message: String,
    /// Stable machine code for programmatic handling
    pub code: String,
    /// HTTP status, duplicated in the body for browser clients
    pub status_code: u16,
}

/// Pipeline failure carried to the HTTP layer.
///
/// The conversion from [`VocettaError`] lets handlers use `?` and leave
/// the envelope shaping here. Rate limit denials additionally carry a
/// `Retry-After` header.
#[derive(Debug)]
pub(crate) struct ApiError(VocettaError);

impl<E> From<E> for ApiError
where
    E: Into<VocettaError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();

        if matches!(kind, VocettaErrorKind::Config(_)) {
            error!(error = %self.0, "request failed unexpectedly");
        }

        let status = StatusCode::from_u16(kind.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let envelope = ErrorEnvelope {
            error: ErrorBody {
                message: kind.public_message(),
                code: kind.code().to_string(),
                status_code: kind.http_status(),
            },
        };

        let mut response = (status, Json(envelope)).into_response();
        if let Some(secs) = kind.retry_after_secs() {
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}

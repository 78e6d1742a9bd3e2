//! Caller identity extraction.
//!
//! Callers are identified two ways: by client address for coarse abuse
//! control, and by an anonymous cookie for per-user accounting. There is
//! no authentication; the cookie is a random token minted on first
//! contact.

use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use uuid::Uuid;

/// Cookie carrying the anonymous user id.
pub(crate) const USER_ID_COOKIE: &str = "tts_user_id";

/// Cookie lifetime: one year, in seconds.
const COOKIE_MAX_AGE: u64 = 365 * 24 * 60 * 60;

/// Best-effort client address.
///
/// Prefers `X-Forwarded-For` (first hop), then `X-Real-IP`; falls back
/// to a shared `"unknown"` bucket when neither header is present. The
/// gateway is expected to sit behind a proxy that sets one of the two.
pub(crate) fn client_ip(headers: &HeaderMap) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if !forwarded.is_empty() {
            if let Some(first) = forwarded.split(',').next() {
                return first.trim().to_string();
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        return real_ip.to_string();
    }

    "unknown".to_string()
}

/// User id from the request cookie, minting a fresh one when absent.
///
/// Returns the id and whether it was minted; a minted id must be set on
/// the response so the identity sticks across requests.
pub(crate) fn user_identity(headers: &HeaderMap) -> (String, bool) {
    match cookie_user_id(headers) {
        Some(id) => (id, false),
        None => (Uuid::new_v4().to_string(), true),
    }
}

/// `Set-Cookie` value persisting a minted id.
pub(crate) fn user_cookie(id: &str) -> String {
    format!(
        "{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=Lax",
        USER_ID_COOKIE, id, COOKIE_MAX_AGE
    )
}

fn cookie_user_id(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(COOKIE)?.to_str().ok()?;
    header.split(';').map(str::trim).find_map(|cookie| {
        let value = cookie.strip_prefix(USER_ID_COOKIE)?.strip_prefix('=')?;
        Some(value.to_string())
    })
}

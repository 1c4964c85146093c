use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use tracing::warn;

use idlerpg_application::AppState;

use crate::error::HttpError;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "x-slack-signature";
pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";
const SIGNATURE_VERSION: &str = "v0";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("missing {0} header")]
    MissingHeader(&'static str),
    #[error("malformed request timestamp")]
    BadTimestamp,
    #[error("request timestamp outside the allowed window")]
    Stale,
    #[error("signature mismatch")]
    Mismatch,
}

/// Rejects webhook requests whose `v0` signature does not match the body.
/// A no-op when no signing secret is configured.
pub async fn verify_slack_signature(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(secret) = state.config.signing_secret.clone() else {
        return next.run(request).await;
    };

    let (parts, body) = request.into_parts();
    let limit = usize::try_from(state.config.max_body_bytes).unwrap_or(usize::MAX);
    let bytes = match to_bytes(body, limit).await {
        Ok(bytes) => bytes,
        Err(err) => return HttpError::BadRequest(err.to_string()).into_response(),
    };

    if let Err(err) = check_request(
        &secret,
        &parts.headers,
        &bytes,
        chrono::Utc::now().timestamp(),
        state.config.signature_max_age_seconds,
    ) {
        warn!("rejected {} {}: {}", parts.method, parts.uri.path(), err);
        return HttpError::Unauthorized.into_response();
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

pub fn check_request(
    secret: &str,
    headers: &HeaderMap,
    body: &[u8],
    now: i64,
    max_age_seconds: u64,
) -> Result<(), SignatureError> {
    let timestamp = header(headers, TIMESTAMP_HEADER)?;
    let signature = header(headers, SIGNATURE_HEADER)?;
    let sent_at = timestamp
        .parse::<i64>()
        .map_err(|_| SignatureError::BadTimestamp)?;
    if now.abs_diff(sent_at) > max_age_seconds {
        return Err(SignatureError::Stale);
    }

    let expected = sign(secret, timestamp, body);
    if !constant_time_eq(expected.as_bytes(), signature.as_bytes()) {
        return Err(SignatureError::Mismatch);
    }
    Ok(())
}

/// `v0=` followed by the hex HMAC-SHA256 of `v0:{timestamp}:{body}`.
pub fn sign(secret: &str, timestamp: &str, body: &[u8]) -> String {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(SIGNATURE_VERSION.as_bytes());
    mac.update(b":");
    mac.update(timestamp.as_bytes());
    mac.update(b":");
    mac.update(body);
    let digest = mac.finalize().into_bytes();

    let mut out = String::with_capacity(SIGNATURE_VERSION.len() + 1 + digest.len() * 2);
    out.push_str(SIGNATURE_VERSION);
    out.push('=');
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

fn header<'a>(headers: &'a HeaderMap, name: &'static str) -> Result<&'a str, SignatureError> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(SignatureError::MissingHeader(name))
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    left.iter()
        .zip(right)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

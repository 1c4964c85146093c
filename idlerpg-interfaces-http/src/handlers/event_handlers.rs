use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use idlerpg_application::commands::handle_event;
use idlerpg_application::AppState;
use idlerpg_domain::EventEnvelope;

use crate::error::HttpError;

/// Events API endpoint. Answers the URL verification handshake; every
/// other body is acknowledged at once and processed in the background.
/// Only bodies that are not JSON at all are rejected. Event shapes the game
/// does not model are logged and dropped.
pub async fn receive_event(State(state): State<AppState>, body: Bytes) -> Result<Response, HttpError> {
    let raw: Value = serde_json::from_slice(&body)
        .map_err(|err| HttpError::BadRequest(format!("invalid event body: {}", err)))?;
    let event_id = raw.get("event_id").and_then(Value::as_str).map(str::to_string);
    let envelope: EventEnvelope = match serde_json::from_value(raw) {
        Ok(envelope) => envelope,
        Err(err) => {
            state.metrics.record_event();
            state.metrics.record_event_dropped();
            warn!("dropping undecodable event {:?}: {}", event_id, err);
            return Ok("ok".into_response());
        }
    };

    if envelope.is_url_verification() {
        let challenge = envelope.challenge.unwrap_or_default();
        return Ok(Json(json!({ "challenge": challenge })).into_response());
    }

    tokio::spawn(async move {
        match handle_event(&state, &envelope, Utc::now()).await {
            Ok(outcome) => debug!("event {:?} handled: {:?}", envelope.event_id, outcome),
            Err(err) => error!("event {:?} failed: {}", envelope.event_id, err),
        }
    });
    Ok("ok".into_response())
}

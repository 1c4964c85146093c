use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;

use idlerpg_application::AppState;

use crate::handlers::{command_handlers, event_handlers, oauth_handlers, ops_handlers};
use crate::middleware::verify_slack_signature;

pub fn build_router(state: AppState) -> Router {
    let webhooks = Router::new()
        .route("/action", post(event_handlers::receive_event))
        .route("/idle", post(command_handlers::receive_command))
        .route_layer(from_fn_with_state(state.clone(), verify_slack_signature));

    Router::new()
        .merge(webhooks)
        .route("/oauth", get(oauth_handlers::oauth_callback))
        .route("/ops/health/live", get(ops_handlers::health_live))
        .route("/ops/health/ready", get(ops_handlers::health_ready))
        .route(
            "/ops/metrics/prometheus",
            get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}

//! Notifier HTTP routes — Jenkins webhook plus status administration.

pub mod webhook;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::NotifierConfig;
use crate::error::NotifierError;
use crate::events::status::JobStatus;
use crate::services::dispatcher::Dispatcher;
use crate::services::status_store::StatusStore;

/// Path the Jenkins Notification Plugin is pointed at.
pub const WEBHOOK_PATH: &str = "/hubot/jenkins-notify";

/// Shared state for notifier route handlers.
#[derive(Clone)]
pub struct NotifierState {
    pub store: Arc<dyn StatusStore>,
    pub dispatcher: Arc<dyn Dispatcher>,
    pub config: NotifierConfig,
}

/// Build the notifier's Axum router.
pub fn notifier_router(state: NotifierState) -> Router {
    Router::new()
        // Webhook
        .route(WEBHOOK_PATH, post(webhook_handler))
        // Administration
        .route("/hubot/jenkins-notify/reset", post(reset_handler))
        .route("/hubot/jenkins-notify/status", get(status_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ── Webhook ──

async fn webhook_handler(
    State(state): State<NotifierState>,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Result<StatusCode, NotifierError> {
    webhook::handle_webhook(&state, &query, &body)
        .await
        .map_err(|e| {
            crate::metrics::request_rejected(e.kind());
            tracing::warn!(
                kind = e.kind(),
                body = %String::from_utf8_lossy(&body),
                "jenkins-notify error: {e}"
            );
            e
        })
}

// ── Administration ──

async fn reset_handler(State(state): State<NotifierState>) -> StatusCode {
    state.store.reset();
    crate::metrics::status_reset();
    StatusCode::OK
}

async fn status_handler(
    State(state): State<NotifierState>,
) -> Json<BTreeMap<String, JobStatus>> {
    Json(state.store.snapshot())
}

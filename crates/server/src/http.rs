//! HTTP Endpoints
//!
//! REST API for the voice relay.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, post},
    Json, Router,
};
use serde_json::Value;
use tower_http::trace::TraceLayer;
use voice_relay_core::{BodyDefaults, BodyPolicy, NotificationOutcome, NotificationRequest};

use crate::metrics::record_request;
use crate::middleware::{cors_middleware, rate_limit_middleware};
use crate::state::AppState;
use crate::ServerError;

/// Plain-text reply for unknown routes and methods
pub const USAGE: &str = "PAI Voice Server - POST to /notify or /pai";

const NOTIFY_POLICY: BodyPolicy = BodyPolicy {
    defaults: BodyDefaults {
        title: "PAI Notification",
        message: "Task completed",
    },
    accepts_voice_options: true,
};

const PAI_POLICY: BodyPolicy = BodyPolicy {
    defaults: BodyDefaults {
        title: "PAI Assistant",
        message: "Task completed",
    },
    accepts_voice_options: false,
};

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/notify", post(notify).fallback(usage))
        .route("/pai", post(pai).fallback(usage))
        .route("/health", any(health_check))
        .fallback(usage)
        // Layers run bottom-up: CORS wraps the rate limiter so 429s carry
        // CORS headers and preflights are never counted
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            cors_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// POST /notify
async fn notify(State(state): State<AppState>, body: Bytes) -> Response {
    let result = handle(&state, &body, NOTIFY_POLICY, "Notification sent").await;
    respond("/notify", result)
}

/// POST /pai
async fn pai(State(state): State<AppState>, body: Bytes) -> Response {
    let result = handle(&state, &body, PAI_POLICY, "PAI notification sent").await;
    respond("/pai", result)
}

async fn handle(
    state: &AppState,
    body: &[u8],
    policy: BodyPolicy,
    success: &'static str,
) -> Result<NotificationOutcome, ServerError> {
    let body: Value = serde_json::from_slice(body)
        .map_err(|e| ServerError::Internal(format!("Failed to parse request body: {}", e)))?;
    if body.is_null() {
        return Err(ServerError::Internal("Request body is null".to_string()));
    }

    let request = NotificationRequest::from_body(&body, policy)?;
    tracing::info!(
        title = %request.title,
        message = %request.message,
        voice_enabled = request.voice_enabled,
        voice_id = request.voice_id.as_deref().unwrap_or("default"),
        "Notification received"
    );

    state.notifier.send(&request).await;
    Ok(NotificationOutcome::success(success))
}

fn respond(endpoint: &'static str, result: Result<NotificationOutcome, ServerError>) -> Response {
    match result {
        Ok(outcome) => {
            record_request(endpoint, StatusCode::OK.as_u16());
            (StatusCode::OK, Json(outcome)).into_response()
        }
        Err(e) => {
            let status = StatusCode::from(&e);
            if status.is_client_error() {
                tracing::warn!(endpoint, error = %e, "Rejected notification");
            }
            record_request(endpoint, status.as_u16());
            e.into_response()
        }
    }
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let config = state.get_config();
    let platform = state.platform.display_name();
    let speech = state.notifier.speech();

    let voice_system = if speech.has_provider() {
        format!("ElevenLabs with {} TTS fallback", platform)
    } else {
        format!("{} TTS", platform)
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "healthy",
            "port": config.server.port,
            "voice_system": voice_system,
            "default_voice_id": config.voice.default_voice_id,
            "api_key_configured": speech.has_provider(),
            "platform": platform,
            "model": config.voice.model_id,
        })),
    )
}

async fn usage() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        USAGE,
    )
}

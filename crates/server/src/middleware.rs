//! Request middleware
//!
//! - CORS headers on every response, `OPTIONS` answered with 204
//! - Rate limiting for everything except preflight requests

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::metrics::record_rate_limited;
use crate::rate_limit::client_identity;
use crate::state::AppState;
use crate::ServerError;

const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type";

/// Attach CORS headers and short-circuit preflight requests
pub async fn cors_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let origin = state.get_config().server.cors_origin.clone();

    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    match HeaderValue::from_str(&origin) {
        Ok(value) => {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
        }
        Err(_) => tracing::warn!(origin = %origin, "Invalid CORS origin, header omitted"),
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );

    response
}

/// Reject clients that exceeded their request window
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    // Extract what we need without holding the guard across await
    let identity = {
        let config = state.get_config();
        let limits = &config.server.rate_limit;
        limits.enabled.then(|| {
            client_identity(
                request.headers(),
                &limits.identity_header,
                &limits.fallback_identity,
            )
        })
    };

    if let Some(identity) = identity {
        if !state.rate_limiter.allow(&identity) {
            tracing::warn!(client = %identity, path = %request.uri().path(), "Rate limit exceeded");
            record_rate_limited();
            return ServerError::RateLimit.into_response();
        }
    }

    next.run(request).await
}

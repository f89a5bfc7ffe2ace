use crate::utils::toml_config::ConfigManager;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::warn;

/// Header accepted as an alternative to `Authorization: Bearer`.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Reject requests that do not present the configured API key.
///
/// The key is resolved from `[auth].api_key_env` on every request so a
/// hot-reloaded config takes effect immediately.
pub async fn require_api_key(
    State(config_manager): State<Arc<ConfigManager>>,
    req: Request,
    next: Next,
) -> Response {
    let expected = match config_manager.config().api_key() {
        Ok(key) => key,
        Err(e) => {
            warn!("API key is not configured: {}", e);
            return unauthorized("API key is not configured");
        }
    };

    match presented_key(req.headers()) {
        Some(key) if key == expected => next.run(req).await,
        Some(_) => unauthorized("Invalid API key"),
        None => unauthorized("Missing API key"),
    }
}

fn presented_key(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    bearer.or_else(|| headers.get(API_KEY_HEADER).and_then(|h| h.to_str().ok()))
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

use crate::{
    agents::entrypoint,
    runtime::SESSION_HEADER,
    types::{AgentType, AppError, InvocationRequest, InvocationResponse, Result},
    AppState,
};
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    response::{
        sse::{Event, Sse},
        IntoResponse, Response,
    },
    Json,
};
use std::convert::Infallible;
use tracing::{info, warn};

/// Run an agent in this process, runtime style
///
/// The response is a single JSON envelope, or one SSE `data:` event carrying
/// the same envelope when the client accepts only `text/event-stream`.
#[utoipa::path(
    post,
    path = "/agents/{agent}/invocations",
    params(
        ("agent" = String, Path, description = "orchestrator, flight, hotel, visa or itinerary"),
        ("X-Amzn-Bedrock-AgentCore-Runtime-Session-Id" = Option<String>, Header, description = "Conversation session id")
    ),
    request_body = InvocationRequest,
    responses(
        (status = 200, description = "Agent result; failures carry status \"error\"", body = InvocationResponse),
        (status = 404, description = "Unknown agent")
    ),
    tag = "agents"
)]
pub async fn invoke_agent(
    State(state): State<AppState>,
    Path(agent): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<InvocationRequest>,
) -> Result<Response> {
    let agent: AgentType = agent
        .parse()
        .map_err(|_| AppError::NotFound(format!("Unknown agent: {}", agent)))?;
    let session_id = headers
        .get(SESSION_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string);
    info!(agent = %agent, session = ?session_id, "Agent invocation");

    if wants_event_stream(&headers) {
        let events = async_stream::stream! {
            let response =
                entrypoint(&state.agent_host, agent, &payload, session_id.as_deref()).await;
            match Event::default().json_data(&response) {
                Ok(event) => yield Ok::<_, Infallible>(event),
                Err(e) => warn!(agent = %agent, error = %e, "Failed to encode invocation event"),
            }
        };
        return Ok(Sse::new(events).into_response());
    }

    let response = entrypoint(&state.agent_host, agent, &payload, session_id.as_deref()).await;
    Ok(Json(response).into_response())
}

/// True when every media type in `Accept` is `text/event-stream`.
fn wants_event_stream(headers: &HeaderMap) -> bool {
    let Some(accept) = headers.get(header::ACCEPT).and_then(|h| h.to_str().ok()) else {
        return false;
    };

    let mut types = accept
        .split(',')
        .map(|part| part.split(';').next().unwrap_or("").trim())
        .filter(|t| !t.is_empty())
        .peekable();

    types.peek().is_some() && types.all(|t| t.eq_ignore_ascii_case("text/event-stream"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn accept(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_event_stream_only() {
        assert!(wants_event_stream(&accept("text/event-stream")));
        assert!(wants_event_stream(&accept("text/event-stream; charset=utf-8")));
    }

    #[test]
    fn test_mixed_accept_prefers_json() {
        assert!(!wants_event_stream(&accept("application/json, text/event-stream")));
        assert!(!wants_event_stream(&accept("*/*")));
        assert!(!wants_event_stream(&HeaderMap::new()));
    }
}

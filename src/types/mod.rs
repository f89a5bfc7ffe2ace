use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

mod trip;

pub use trip::*;

// ============= Agent Types =============

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AgentType {
    Orchestrator,
    Flight,
    Hotel,
    Visa,
    Itinerary,
}

impl AgentType {
    /// Every agent, orchestrator first.
    pub const ALL: [AgentType; 5] = [
        AgentType::Orchestrator,
        AgentType::Flight,
        AgentType::Hotel,
        AgentType::Visa,
        AgentType::Itinerary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::Orchestrator => "orchestrator",
            AgentType::Flight => "flight",
            AgentType::Hotel => "hotel",
            AgentType::Visa => "visa",
            AgentType::Itinerary => "itinerary",
        }
    }

    /// Human readable name used in listings.
    pub fn display_name(&self) -> &'static str {
        match self {
            AgentType::Orchestrator => "Umrah Trip Coordinator",
            AgentType::Flight => "Flight Search Specialist",
            AgentType::Hotel => "Hotel Booking Specialist",
            AgentType::Visa => "Visa Requirements Specialist",
            AgentType::Itinerary => "Itinerary Planning Specialist",
        }
    }

    pub fn is_specialist(&self) -> bool {
        !matches!(self, AgentType::Orchestrator)
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        AgentType::ALL
            .into_iter()
            .find(|agent| agent.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| {
                let names: Vec<&str> = AgentType::ALL.iter().map(|a| a.as_str()).collect();
                AppError::InvalidInput(format!(
                    "Unknown agent type: {}. Must be one of {:?}",
                    s, names
                ))
            })
    }
}

#[derive(Debug, Clone)]
pub struct AgentContext {
    pub session_id: String,
    pub conversation_history: Vec<Message>,
}

impl AgentContext {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            conversation_history: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

// ============= Runtime Payloads =============

/// Body accepted by an agent runtime invocation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InvocationRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InvocationStatus {
    Success,
    Error,
}

/// Envelope returned by an agent runtime entrypoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InvocationResponse {
    #[schema(value_type = Object)]
    pub result: serde_json::Value,
    pub status: InvocationStatus,
}

// ============= Tool Types =============

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("LLM error: {0}")]
    LLM(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let (status, message) = match self {
            AppError::LLM(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Configuration(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Upstream(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("JSON error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_type_round_trips_names() {
        for agent in AgentType::ALL {
            assert_eq!(agent.as_str().parse::<AgentType>().unwrap(), agent);
        }
        assert_eq!(" Hotel ".parse::<AgentType>().unwrap(), AgentType::Hotel);
    }

    #[test]
    fn test_unknown_agent_type_lists_valid_names() {
        let err = "concierge".parse::<AgentType>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Unknown agent type: concierge"));
        assert!(message.contains("orchestrator"));
        assert!(message.contains("itinerary"));
    }

    #[test]
    fn test_agent_type_serializes_lowercase() {
        let json = serde_json::to_string(&AgentType::Visa).unwrap();
        assert_eq!(json, "\"visa\"");
        assert!(AgentType::Visa.is_specialist());
        assert!(!AgentType::Orchestrator.is_specialist());
    }

    #[test]
    fn test_error_status_codes() {
        use axum::http::StatusCode;
        use axum::response::IntoResponse;

        let cases = [
            (AppError::Auth("x".into()), StatusCode::UNAUTHORIZED),
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Upstream("x".into()), StatusCode::BAD_GATEWAY),
            (AppError::Conflict("x".into()), StatusCode::CONFLICT),
            (AppError::LLM("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }
}

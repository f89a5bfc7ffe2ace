use super::sse::DataLines;
use super::AgentInvoker;
use crate::auth::{ClientCredentials, TokenCache};
use crate::types::{AgentType, AppError, Result};
use crate::utils::toml_config::RuntimeConfig;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Header carrying the runtime session id.
pub const SESSION_HEADER: &str = "X-Amzn-Bedrock-AgentCore-Runtime-Session-Id";

/// How a runtime response body is framed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    EventStream,
    Json,
    Other,
}

impl Framing {
    pub fn from_content_type(content_type: &str) -> Self {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();

        if content_type.to_ascii_lowercase().contains("text/event-stream") {
            Framing::EventStream
        } else if essence == "application/json" {
            Framing::Json
        } else {
            Framing::Other
        }
    }
}

/// Client for agents deployed on the hosted agent runtime.
pub struct AgentRuntimeClient {
    endpoint: String,
    agents: HashMap<AgentType, String>,
    http: reqwest::Client,
    token: Option<Arc<TokenCache>>,
}

impl AgentRuntimeClient {
    /// Build a client; agent names in `[runtime.agents]` that are not known
    /// agent types are ignored.
    pub fn new(config: &RuntimeConfig, token: Option<Arc<TokenCache>>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .read_timeout(Duration::from_secs(config.read_timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        let agents = config
            .agents
            .iter()
            .filter_map(|(name, arn)| name.parse::<AgentType>().ok().map(|a| (a, arn.clone())))
            .collect();

        Ok(Self {
            endpoint: config.endpoint_url(),
            agents,
            http,
            token,
        })
    }

    pub fn from_config(config: &RuntimeConfig) -> Result<Self> {
        let token = match &config.oauth {
            Some(oauth) => Some(Arc::new(TokenCache::new(ClientCredentials::from_config(
                oauth,
            )?))),
            None => None,
        };
        Self::new(config, token)
    }

    pub fn agent_arn(&self, agent: AgentType) -> Result<&str> {
        self.agents.get(&agent).map(String::as_str).ok_or_else(|| {
            let mut names: Vec<&str> = self.agents.keys().map(|a| a.as_str()).collect();
            names.sort_unstable();
            AppError::InvalidInput(format!(
                "Unknown agent type: {}. Must be one of {:?}",
                agent, names
            ))
        })
    }

    pub fn invocation_url(&self, arn: &str) -> String {
        format!(
            "{}/runtimes/{}/invocations?qualifier=DEFAULT",
            self.endpoint,
            urlencoding::encode(arn)
        )
    }

    /// Invoke an agent and return its JSON response.
    ///
    /// Only an unconfigured agent is an `Err`. Every other failure comes back
    /// as `{"error", "agent_type", "agent_arn"}` so callers can show it.
    #[instrument(skip(self, prompt), fields(agent = %agent))]
    pub async fn invoke_agent(
        &self,
        agent: AgentType,
        prompt: &str,
        session_id: Option<&str>,
    ) -> Result<Value> {
        let arn = self.agent_arn(agent)?;
        let session = session_id
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        match self.try_invoke(arn, prompt, &session).await {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(error = %e, "Agent invocation failed");
                Ok(json!({
                    "error": e.to_string(),
                    "agent_type": agent.as_str(),
                    "agent_arn": arn
                }))
            }
        }
    }

    /// Invoke an agent and return its raw output as text.
    ///
    /// Stream chunks are joined with newlines; failures are `Err`.
    #[instrument(skip(self, prompt), fields(agent = %agent))]
    pub async fn invoke_agent_text(&self, agent: AgentType, prompt: &str) -> Result<String> {
        let arn = self.agent_arn(agent)?;
        let session = Uuid::new_v4().to_string();
        let response = self.post(arn, prompt, &session).await?;

        match Framing::from_content_type(&content_type(&response)) {
            Framing::EventStream => Ok(read_data_lines(response).await?.join("\n")),
            _ => response
                .text()
                .await
                .map_err(|e| AppError::Upstream(format!("Failed to read runtime response: {}", e))),
        }
    }

    async fn try_invoke(&self, arn: &str, prompt: &str, session: &str) -> Result<Value> {
        let response = self.post(arn, prompt, session).await?;
        let content_type = content_type(&response);

        match Framing::from_content_type(&content_type) {
            Framing::EventStream => {
                let chunks = read_data_lines(response).await?;
                debug!(chunks = chunks.len(), "Read event stream");

                let Some(last) = chunks.last() else {
                    return Ok(json!({ "error": "No content in streaming response" }));
                };

                match serde_json::from_str::<Value>(last) {
                    Ok(value) => Ok(value),
                    Err(e) => Ok(json!({
                        "error": format!("Invalid JSON in streaming response: {}", e),
                        "response": last
                    })),
                }
            }
            Framing::Json => {
                let body = response.text().await.map_err(|e| {
                    AppError::Upstream(format!("Failed to read runtime response: {}", e))
                })?;
                serde_json::from_str(&body)
                    .map_err(|e| AppError::Upstream(format!("Invalid JSON from runtime: {}", e)))
            }
            Framing::Other => {
                let body = response.text().await.unwrap_or_default();
                Ok(json!({
                    "error": "Unexpected content type",
                    "content_type": content_type,
                    "response": body
                }))
            }
        }
    }

    async fn post(&self, arn: &str, prompt: &str, session: &str) -> Result<reqwest::Response> {
        let url = self.invocation_url(arn);
        let body = json!({ "prompt": prompt });

        let mut response = self.send(&url, &body, session).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            if let Some(token) = &self.token {
                warn!("Runtime rejected bearer token, refreshing");
                token.invalidate().await;
                response = self.send(&url, &body, session).await?;
            }
        }

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "Runtime returned {}: {}",
                status,
                text.chars().take(500).collect::<String>()
            )));
        }

        Ok(response)
    }

    async fn send(&self, url: &str, body: &Value, session: &str) -> Result<reqwest::Response> {
        let mut request = self
            .http
            .post(url)
            .header(ACCEPT, "application/json, text/event-stream")
            .header(SESSION_HEADER, session)
            .json(body);

        if let Some(token) = &self.token {
            request = request.bearer_auth(token.bearer_token().await?);
        }

        request
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Runtime request failed: {}", e)))
    }
}

#[async_trait]
impl AgentInvoker for AgentRuntimeClient {
    async fn invoke(&self, agent: AgentType, prompt: &str, session_id: Option<&str>) -> Result<Value> {
        self.invoke_agent(agent, prompt, session_id).await
    }

    async fn invoke_text(&self, agent: AgentType, prompt: &str) -> Result<String> {
        self.invoke_agent_text(agent, prompt).await
    }

    fn agents(&self) -> Vec<AgentType> {
        AgentType::ALL
            .into_iter()
            .filter(|a| self.agents.contains_key(a))
            .collect()
    }
}

fn content_type(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

async fn read_data_lines(response: reqwest::Response) -> Result<Vec<String>> {
    let mut lines = DataLines::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| AppError::Upstream(format!("Stream error: {}", e)))?;
        lines.push(&chunk);
    }

    Ok(lines.finish())
}

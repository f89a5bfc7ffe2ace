use crate::auth::{ClientCredentials, TokenCache};
use crate::types::{AppError, Result};
use crate::utils::toml_config::GatewayConfig;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// A tool advertised by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayTool {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "inputSchema")]
    pub input_schema: Option<Value>,
}

pub struct GatewayClient {
    url: String,
    http: reqwest::Client,
    token: Option<Arc<TokenCache>>,
}

impl GatewayClient {
    pub fn new(url: impl Into<String>, timeout: Duration, token: Option<Arc<TokenCache>>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            http,
            token,
        })
    }

    /// Build a client from `[gateway]`; `None` when no URL is configured.
    pub fn from_config(config: &GatewayConfig) -> Result<Option<Self>> {
        let Some(url) = config.url.as_deref() else {
            return Ok(None);
        };

        let token = match &config.oauth {
            Some(oauth) => Some(Arc::new(TokenCache::new(ClientCredentials::from_config(
                oauth,
            )?))),
            None => None,
        };

        Self::new(url, Duration::from_secs(config.timeout_secs), token).map(Some)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Call a gateway tool and return its text output.
    ///
    /// JSON-RPC errors are returned as `{"error": ...}` text rather than `Err`,
    /// so the calling agent can relay them.
    #[instrument(skip(self, arguments), fields(gateway = %self.url))]
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<String> {
        let response = self
            .rpc("tools/call", json!({ "name": name, "arguments": arguments }))
            .await?;

        Ok(extract_tool_text(&response))
    }

    /// List the tools the gateway exposes.
    #[instrument(skip(self), fields(gateway = %self.url))]
    pub async fn list_tools(&self) -> Result<Vec<GatewayTool>> {
        let response = self.rpc("tools/list", json!({})).await?;

        if let Some(error) = response.get("error") {
            return Err(AppError::Upstream(format!("Gateway error: {}", error)));
        }

        let tools = response
            .get("result")
            .and_then(|r| r.get("tools"))
            .cloned()
            .unwrap_or_else(|| json!([]));

        Ok(serde_json::from_value(tools)?)
    }

    async fn rpc(&self, method: &str, params: Value) -> Result<Value> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params
        });

        let mut response = self.send(&body).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            if let Some(token) = &self.token {
                warn!("Gateway rejected bearer token, refreshing");
                token.invalidate().await;
                response = self.send(&body).await?;
            }
        }

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "Gateway returned {}: {}",
                status, text
            )));
        }

        debug!(method, "Gateway call succeeded");

        response
            .json::<Value>()
            .await
            .map_err(|e| AppError::Upstream(format!("Invalid gateway response: {}", e)))
    }

    async fn send(&self, body: &Value) -> Result<reqwest::Response> {
        let mut request = self.http.post(&self.url).json(body);

        if let Some(token) = &self.token {
            request = request.bearer_auth(token.bearer_token().await?);
        }

        request
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Gateway request failed: {}", e)))
    }
}

/// Text of an MCP `tools/call` response.
///
/// The first `type == "text"` content item wins; otherwise the JSON of
/// `result`; a response without `result` becomes `{"error": ...}`.
pub fn extract_tool_text(response: &Value) -> String {
    match response.get("result") {
        Some(result) => result
            .get("content")
            .and_then(|c| c.as_array())
            .and_then(|items| {
                items.iter().find_map(|item| {
                    if item.get("type").and_then(|t| t.as_str()) == Some("text") {
                        item.get("text").and_then(|t| t.as_str()).map(str::to_string)
                    } else {
                        None
                    }
                })
            })
            .unwrap_or_else(|| result.to_string()),
        None => {
            let error = response
                .get("error")
                .cloned()
                .unwrap_or_else(|| Value::String("Unknown error".to_string()));
            json!({ "error": error }).to_string()
        }
    }
}

use crate::runtime::AgentInvoker;
use crate::tools::registry::{parse_args, Tool};
use crate::types::{AgentType, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Deserialize)]
struct DelegateArgs {
    request: String,
}

/// Orchestrator tool that forwards a natural-language request to a
/// specialist agent and returns its text.
///
/// A failed delegation becomes a text result so the orchestrator can carry
/// on with the other specialists.
pub struct DelegateTool {
    name: &'static str,
    description: &'static str,
    example: &'static str,
    error_prefix: &'static str,
    agent: AgentType,
    invoker: Arc<dyn AgentInvoker>,
}

impl DelegateTool {
    pub fn search_flights(invoker: Arc<dyn AgentInvoker>) -> Self {
        Self {
            name: "search_flights_agent",
            description: "Search for real flights using the Flight Agent. Returns flight options with prices and availability.",
            example: "Find flights from New York to Medina departing March 15, 2026 returning March 25, 2026 for 2 adults",
            error_prefix: "Error searching flights",
            agent: AgentType::Flight,
            invoker,
        }
    }

    pub fn search_hotels(invoker: Arc<dyn AgentInvoker>) -> Self {
        Self {
            name: "search_hotels_agent",
            description: "Search for real hotels using the Hotel Agent. Returns hotel options with prices and availability.",
            example: "Find hotels in Makkah near Haram for March 15-20, 2026 for 2 adults, prefer 4-5 star",
            error_prefix: "Error searching hotels",
            agent: AgentType::Hotel,
            invoker,
        }
    }

    pub fn visa_info(invoker: Arc<dyn AgentInvoker>) -> Self {
        Self {
            name: "get_visa_info",
            description: "Get visa requirements and the application process using the Visa Agent.",
            example: "What are the visa requirements for US citizens?",
            error_prefix: "Error getting visa info",
            agent: AgentType::Visa,
            invoker,
        }
    }

    pub fn create_itinerary(invoker: Arc<dyn AgentInvoker>) -> Self {
        Self {
            name: "create_itinerary",
            description: "Create a detailed day-by-day Umrah itinerary using the Itinerary Agent.",
            example: "Create a 10-day Umrah itinerary starting in Medina",
            error_prefix: "Error creating itinerary",
            agent: AgentType::Itinerary,
            invoker,
        }
    }

    /// All four delegation tools.
    pub fn all(invoker: Arc<dyn AgentInvoker>) -> Vec<DelegateTool> {
        vec![
            Self::search_flights(Arc::clone(&invoker)),
            Self::search_hotels(Arc::clone(&invoker)),
            Self::visa_info(Arc::clone(&invoker)),
            Self::create_itinerary(invoker),
        ]
    }

    pub fn agent(&self) -> AgentType {
        self.agent
    }
}

#[async_trait]
impl Tool for DelegateTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "request": {
                    "type": "string",
                    "description": format!("Natural language request, e.g. \"{}\"", self.example)
                }
            },
            "required": ["request"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let args: DelegateArgs = parse_args(self.name, args)?;

        match self.invoker.invoke_text(self.agent, &args.request).await {
            Ok(text) => Ok(Value::String(text)),
            Err(e) => {
                warn!(agent = %self.agent, error = %e, "Delegation failed");
                Ok(Value::String(format!("{}: {}", self.error_prefix, e)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AppError;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingInvoker {
        calls: Mutex<Vec<(AgentType, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl AgentInvoker for RecordingInvoker {
        async fn invoke(&self, _: AgentType, _: &str, _: Option<&str>) -> Result<Value> {
            Ok(json!({}))
        }

        async fn invoke_text(&self, agent: AgentType, prompt: &str) -> Result<String> {
            self.calls.lock().push((agent, prompt.to_string()));
            if self.fail {
                Err(AppError::Upstream("Runtime returned 503".into()))
            } else {
                Ok(format!("{} answer", agent))
            }
        }

        fn agents(&self) -> Vec<AgentType> {
            AgentType::ALL.to_vec()
        }
    }

    #[tokio::test]
    async fn test_forwards_request_to_specialist() {
        let invoker = Arc::new(RecordingInvoker::default());
        let tool = DelegateTool::visa_info(invoker.clone());

        let result = tool
            .execute(json!({"request": "Visa rules for British citizens?"}))
            .await
            .unwrap();

        assert_eq!(result, json!("visa answer"));
        let calls = invoker.calls.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, AgentType::Visa);
        assert_eq!(calls[0].1, "Visa rules for British citizens?");
    }

    #[tokio::test]
    async fn test_failure_becomes_text() {
        let invoker = Arc::new(RecordingInvoker {
            fail: true,
            ..Default::default()
        });
        let tool = DelegateTool::search_flights(invoker);

        let result = tool.execute(json!({"request": "MAN to JED"})).await.unwrap();
        assert_eq!(
            result,
            json!("Error searching flights: Upstream error: Runtime returned 503")
        );
    }

    #[test]
    fn test_all_covers_every_specialist() {
        let tools = DelegateTool::all(Arc::new(RecordingInvoker::default()));
        let agents: Vec<AgentType> = tools.iter().map(|t| t.agent()).collect();
        assert_eq!(
            agents,
            vec![AgentType::Flight, AgentType::Hotel, AgentType::Visa, AgentType::Itinerary]
        );
        assert_eq!(tools[3].name(), "create_itinerary");
    }
}

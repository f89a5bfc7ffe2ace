use crate::planner::plan::{generate_mock_trip_plan, generate_trip_plan_from_ai, AiResponses, Pricing};
use crate::runtime::{extract_text_from_response, AgentInvoker};
use crate::types::{GeneratedTrip, PlanSource, TripPlan, TripRequest};
use crate::utils::toml_config::PlannerConfig;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Turns a [`TripRequest`] into a [`GeneratedTrip`].
///
/// In demo mode, or without an invoker, the sample plan is returned straight
/// away. Otherwise the orchestrator plans the trip and its answer is parsed;
/// any failure falls back to the sample plan.
#[derive(Clone)]
pub struct TripPlanner {
    invoker: Option<Arc<dyn AgentInvoker>>,
    demo_mode: bool,
    pricing: Pricing,
}

impl TripPlanner {
    pub fn new(invoker: Option<Arc<dyn AgentInvoker>>, config: &PlannerConfig) -> Self {
        Self {
            invoker,
            demo_mode: config.demo_mode,
            pricing: Pricing::from(config),
        }
    }

    pub fn is_demo(&self) -> bool {
        self.demo_mode || self.invoker.is_none()
    }

    pub fn pricing(&self) -> &Pricing {
        &self.pricing
    }

    fn mock(&self, request: &TripRequest) -> GeneratedTrip {
        self.finish(request, None, generate_mock_trip_plan(request, &self.pricing), PlanSource::Mock)
    }

    fn finish(
        &self,
        request: &TripRequest,
        ai_response: Option<String>,
        plan: TripPlan,
        source: PlanSource,
    ) -> GeneratedTrip {
        GeneratedTrip {
            ai_response,
            user_data: request.clone(),
            generated_at: Utc::now(),
            plan,
            source,
        }
    }

    #[instrument(skip_all, fields(travelers = request.num_travelers))]
    pub async fn generate(&self, request: &TripRequest) -> GeneratedTrip {
        let invoker = match &self.invoker {
            Some(invoker) if !self.demo_mode => invoker,
            _ => {
                info!("Demo mode, returning sample plan");
                return self.mock(request);
            }
        };

        let response = match invoker.invoke_orchestrator(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Orchestrator invocation failed, using sample plan");
                return self.mock(request);
            }
        };

        let text = extract_text_from_response(&response);
        if response.get("status").and_then(Value::as_str) == Some("error")
            || text.starts_with("Error:")
        {
            warn!(response = %text, "Orchestrator reported an error, using sample plan");
            return self.mock(request);
        }

        let responses = AiResponses {
            orchestrator: text.clone(),
            ..Default::default()
        };
        let plan = generate_trip_plan_from_ai(&responses, request, &self.pricing);
        info!(
            flights = plan.flights.len(),
            makkah_hotels = plan.hotels.makkah.len(),
            madinah_hotels = plan.hotels.madinah.len(),
            "Trip plan generated from agent output"
        );
        self.finish(request, Some(text), plan, PlanSource::Agents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AgentType, AppError, Result};
    use async_trait::async_trait;
    use serde_json::json;

    struct FixedInvoker(Result<Value>);

    #[async_trait]
    impl AgentInvoker for FixedInvoker {
        async fn invoke(&self, _: AgentType, _: &str, _: Option<&str>) -> Result<Value> {
            match &self.0 {
                Ok(value) => Ok(value.clone()),
                Err(e) => Err(AppError::Upstream(e.to_string())),
            }
        }

        async fn invoke_text(&self, _: AgentType, _: &str) -> Result<String> {
            Ok(String::new())
        }

        fn agents(&self) -> Vec<AgentType> {
            vec![AgentType::Orchestrator]
        }
    }

    fn live_config() -> PlannerConfig {
        PlannerConfig {
            demo_mode: false,
            ..Default::default()
        }
    }

    fn request() -> TripRequest {
        let mut request = TripRequest::default();
        request.num_travelers = 1;
        request
    }

    #[tokio::test]
    async fn test_demo_mode_skips_agents() {
        let invoker: Arc<dyn AgentInvoker> = Arc::new(FixedInvoker(Err(AppError::Internal(
            "must not be called".into(),
        ))));
        let planner = TripPlanner::new(Some(invoker), &PlannerConfig::default());

        let trip = planner.generate(&request()).await;
        assert_eq!(trip.source, PlanSource::Mock);
        assert!(trip.ai_response.is_none());
        assert!(planner.is_demo());
    }

    #[tokio::test]
    async fn test_agent_answer_is_parsed() {
        let invoker: Arc<dyn AgentInvoker> = Arc::new(FixedInvoker(Ok(json!({
            "result": {"role": "assistant", "content": [{"text": "Option 1 (Morning) - $777"}]}
        }))));
        let planner = TripPlanner::new(Some(invoker), &live_config());

        let trip = planner.generate(&request()).await;
        assert_eq!(trip.source, PlanSource::Agents);
        assert_eq!(trip.ai_response.as_deref(), Some("Option 1 (Morning) - $777"));
        assert_eq!(trip.plan.flights[0].price, 777);
    }

    #[tokio::test]
    async fn test_error_payload_falls_back() {
        let invoker: Arc<dyn AgentInvoker> = Arc::new(FixedInvoker(Ok(json!({
            "error": "connection refused",
            "agent_type": "orchestrator"
        }))));
        let trip = TripPlanner::new(Some(invoker), &live_config())
            .generate(&request())
            .await;
        assert_eq!(trip.source, PlanSource::Mock);
    }

    #[tokio::test]
    async fn test_error_status_falls_back() {
        let invoker: Arc<dyn AgentInvoker> = Arc::new(FixedInvoker(Ok(json!({
            "result": {"content": [{"text": "I apologize, but I encountered an error: boom"}]},
            "status": "error"
        }))));
        let trip = TripPlanner::new(Some(invoker), &live_config())
            .generate(&request())
            .await;
        assert_eq!(trip.source, PlanSource::Mock);
    }

    #[tokio::test]
    async fn test_invoker_failure_falls_back() {
        let invoker: Arc<dyn AgentInvoker> =
            Arc::new(FixedInvoker(Err(AppError::Upstream("down".into()))));
        let trip = TripPlanner::new(Some(invoker), &live_config())
            .generate(&request())
            .await;
        assert_eq!(trip.source, PlanSource::Mock);
        assert_eq!(trip.plan.flights[0].airline, "Saudi Airlines");
    }
}

mod common;

use common::mocks::MockLLMClient;
use serde_json::json;
use std::sync::Arc;
use umrah::auth::{ClientCredentials, TokenCache};
use umrah::runtime::SESSION_HEADER;
use umrah::types::{AgentType, PlanSource, ToolCall, TripRequest};
use umrah::utils::toml_config::{ClientAuthMethod, RuntimeConfig};
use umrah::{AgentInvoker, AgentRuntimeClient};
use wiremock::matchers::{body_json, header, header_exists, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VISA_ARN: &str = "arn:aws:bedrock-agentcore:us-west-2:123456789012:runtime/umrah_visa_agent";
const ORCHESTRATOR_ARN: &str =
    "arn:aws:bedrock-agentcore:us-west-2:123456789012:runtime/umrah_orchestrator";
const FLIGHT_ARN: &str =
    "arn:aws:bedrock-agentcore:us-west-2:123456789012:runtime/umrah_flight_agent";

fn runtime_config(server: &MockServer) -> RuntimeConfig {
    let mut config = RuntimeConfig {
        endpoint: Some(server.uri()),
        ..Default::default()
    };
    config.agents.insert("visa".into(), VISA_ARN.into());
    config.agents.insert("orchestrator".into(), ORCHESTRATOR_ARN.into());
    config
}

fn client(server: &MockServer) -> AgentRuntimeClient {
    AgentRuntimeClient::new(&runtime_config(server), None).unwrap()
}

fn invocations() -> wiremock::MockBuilder {
    Mock::given(method("POST"))
        .and(path_regex(r"^/runtimes/[^/]+/invocations$"))
        .and(query_param("qualifier", "DEFAULT"))
}

#[tokio::test]
async fn test_json_response_is_returned_as_is() {
    let server = MockServer::start().await;
    invocations()
        .and(header(SESSION_HEADER, "session-42"))
        .and(body_json(json!({"prompt": "UK passport"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "Apply for a tourist eVisa.",
            "status": "success"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server)
        .invoke(AgentType::Visa, "UK passport", Some("session-42"))
        .await
        .unwrap();
    assert_eq!(response["result"], "Apply for a tourist eVisa.");
}

#[tokio::test]
async fn test_fresh_session_id_when_none_given() {
    let server = MockServer::start().await;
    invocations()
        .and(header_exists(SESSION_HEADER))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .invoke(AgentType::Visa, "hello", None)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_event_stream_uses_last_chunk() {
    let server = MockServer::start().await;
    let body = "data: {\"status\":\"thinking\"}\n\ndata: {\"result\":\"done\",\"status\":\"success\"}\n\n";
    invocations()
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(body, "text/event-stream"),
        )
        .mount(&server)
        .await;

    let response = client(&server)
        .invoke(AgentType::Visa, "hello", None)
        .await
        .unwrap();
    assert_eq!(response, json!({"result": "done", "status": "success"}));
}

#[tokio::test]
async fn test_event_stream_with_plain_text_last_chunk() {
    let server = MockServer::start().await;
    invocations()
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("data: not json at all\n\n", "text/event-stream"),
        )
        .mount(&server)
        .await;

    let response = client(&server)
        .invoke(AgentType::Visa, "hello", None)
        .await
        .unwrap();
    assert!(response["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid JSON in streaming response"));
    assert_eq!(response["response"], "not json at all");
}

#[tokio::test]
async fn test_empty_event_stream() {
    let server = MockServer::start().await;
    invocations()
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(": keep-alive\n\n", "text/event-stream"),
        )
        .mount(&server)
        .await;

    let response = client(&server)
        .invoke(AgentType::Visa, "hello", None)
        .await
        .unwrap();
    assert_eq!(response["error"], "No content in streaming response");
}

#[tokio::test]
async fn test_unexpected_content_type_is_reported() {
    let server = MockServer::start().await;
    invocations()
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/plain")
                .set_body_string("plain words"),
        )
        .mount(&server)
        .await;

    let response = client(&server)
        .invoke(AgentType::Visa, "hello", None)
        .await
        .unwrap();
    assert_eq!(response["error"], "Unexpected content type");
    assert_eq!(response["response"], "plain words");
}

#[tokio::test]
async fn test_http_error_becomes_error_payload() {
    let server = MockServer::start().await;
    invocations()
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let response = client(&server)
        .invoke(AgentType::Visa, "hello", None)
        .await
        .unwrap();
    assert!(response["error"].as_str().unwrap().contains("502"));
    assert_eq!(response["agent_type"], "visa");
    assert_eq!(response["agent_arn"], VISA_ARN);
}

#[tokio::test]
async fn test_unconfigured_agent_is_an_error() {
    let server = MockServer::start().await;
    let err = client(&server)
        .invoke(AgentType::Hotel, "hello", None)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Unknown agent type: hotel"));
    assert_eq!(
        client(&server).agents(),
        vec![AgentType::Orchestrator, AgentType::Visa]
    );
}

#[tokio::test]
async fn test_invoke_text_joins_stream_chunks() {
    let server = MockServer::start().await;
    invocations()
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("data: \"Day 1\"\n\ndata: \"Day 2\"\n\n", "text/event-stream"),
        )
        .mount(&server)
        .await;

    let text = client(&server)
        .invoke_text(AgentType::Visa, "hello")
        .await
        .unwrap();
    assert_eq!(text, "\"Day 1\"\n\"Day 2\"");
}

#[tokio::test]
async fn test_rejected_token_is_refreshed_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "runtime-token",
            "expires_in": 3600
        })))
        .expect(2)
        .mount(&server)
        .await;
    invocations()
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    invocations()
        .and(header("authorization", "Bearer runtime-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let token = Arc::new(TokenCache::new(ClientCredentials {
        token_endpoint: format!("{}/oauth2/token", server.uri()),
        client_id: "client".into(),
        client_secret: "secret".into(),
        scope: None,
        method: ClientAuthMethod::Basic,
    }));
    let client = AgentRuntimeClient::new(&runtime_config(&server), Some(token)).unwrap();

    let response = client.invoke(AgentType::Visa, "hello", None).await.unwrap();
    assert_eq!(response["result"], "ok");
}

#[tokio::test]
async fn test_remote_mode_plans_through_runtime() {
    let server = MockServer::start().await;
    invocations()
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"role": "assistant", "content": [{"text": "Option 1 (Morning) - $910"}]},
            "status": "success"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let extra = format!(
        r#"
[planner]
demo_mode = false

[runtime]
mode = "remote"
endpoint = "{}"

[runtime.agents]
orchestrator = "{}"
flight = "arn:flight"
hotel = "arn:hotel"
visa = "{}"
itinerary = "arn:itinerary"
"#,
        server.uri(),
        ORCHESTRATOR_ARN,
        VISA_ARN
    );
    let state = common::state_with(
        "UMRAH_TEST_KEY_REMOTE",
        "key",
        &extra,
        MockLLMClient::failing(),
    );

    let mut request = TripRequest::default();
    request.num_travelers = 1;
    let trip = state.planner().generate(&request).await;

    assert_eq!(trip.source, PlanSource::Agents);
    assert_eq!(trip.plan.flights[0].price, 910);
    assert_eq!(state.invoker.agents().len(), 5);
}

#[tokio::test]
async fn test_local_orchestrator_delegates_to_remote_specialists() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex("umrah_flight_agent"))
        .and(query_param("qualifier", "DEFAULT"))
        .and(body_json(json!({"prompt": "LHR to JED in March"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "Option 1 (Morning) - $640",
            "status": "success"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let extra = format!(
        r#"
[runtime]
mode = "remote"
endpoint = "{}"

[runtime.agents]
orchestrator = "{}"
flight = "{}"
hotel = "arn:hotel"
visa = "{}"
itinerary = "arn:itinerary"
"#,
        server.uri(),
        ORCHESTRATOR_ARN,
        FLIGHT_ARN,
        VISA_ARN
    );
    let orchestrator = MockLLMClient::with_tool_calls(
        "Flights found",
        vec![ToolCall {
            id: "call_flights".into(),
            name: "search_flights_agent".into(),
            arguments: json!({"request": "LHR to JED in March"}),
        }],
    );
    let state = common::state_with("UMRAH_TEST_KEY_DELEGATE", "key", &extra, orchestrator);

    let text = state
        .agent_host
        .invoke_text(AgentType::Orchestrator, "Plan a March trip")
        .await
        .unwrap();
    assert_eq!(text, "Flights found");
}

//! End-to-end pipeline tests against mocked agents

use std::sync::Arc;

use agent_engine_connector::domain::entities::{ConnectionInfo, LlmQuery, Trace};
use agent_engine_connector::domain::traits::LlmAgent;
use agent_engine_connector::infrastructure::config::Config;
use agent_engine_connector::infrastructure::connections::StaticConnectionStore;
use agent_engine_connector::plugins::{A2AAgent, A2AAgentConfig, PluginManager};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENGINE: &str = "projects/p1/locations/us-central1/reasoningEngines/42";

fn agent_text(text: &str) -> Value {
    json!({
        "kind": "message",
        "messageId": format!("reply-{}", text),
        "role": "agent",
        "parts": [{"kind": "text", "text": text}]
    })
}

async fn mount_card(server: &MockServer, card: Value) {
    Mock::given(method("GET"))
        .and(path("/.well-known/agent-card.json"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(card))
        .mount(server)
        .await;
}

async fn ask(agent: &A2AAgent, prompt: &str) -> String {
    agent
        .process(&LlmQuery::from_prompt(prompt), &json!({}), &mut Trace::new("test"))
        .await
        .text
}

fn standard_agent(server: &MockServer) -> A2AAgent {
    A2AAgent::new(
        "remote",
        A2AAgentConfig::standard("secret", server.uri()),
        Arc::new(StaticConnectionStore::default()),
    )
}

#[tokio::test]
async fn test_standard_server_streaming_reply() {
    let server = MockServer::start().await;
    mount_card(
        &server,
        json!({
            "name": "pong",
            "url": server.uri(),
            "capabilities": {"streaming": true}
        }),
    )
    .await;

    let events = [
        json!({"jsonrpc": "2.0", "id": "1", "result": agent_text("pong-1")}),
        json!({"jsonrpc": "2.0", "id": "1", "result": {
            "kind": "artifact-update",
            "taskId": "t1",
            "artifact": {"artifactId": "a1", "parts": [{"kind": "text", "text": "ignored"}]}
        }}),
        json!({"jsonrpc": "2.0", "id": "1", "result": agent_text("pong-2")}),
    ];
    let body: String = events
        .iter()
        .map(|event| format!("data: {}\n\n", event))
        .collect();

    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("authorization", "Bearer secret"))
        .and(body_partial_json(json!({
            "method": "message/stream",
            "params": {"message": {"role": "user", "parts": [{"kind": "text", "text": "ping"}]}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(ask(&standard_agent(&server), "ping").await, "pong-1\npong-2");
}

#[tokio::test]
async fn test_reply_without_text_gives_placeholder() {
    let server = MockServer::start().await;
    mount_card(&server, json!({"name": "quiet", "url": server.uri()})).await;

    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_partial_json(json!({"method": "message/send"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": "1",
            "result": {
                "kind": "task",
                "id": "t1",
                "contextId": "c1",
                "status": {"state": "completed"}
            }
        })))
        .mount(&server)
        .await;

    assert_eq!(
        ask(&standard_agent(&server), "hello").await,
        "No response text received"
    );
}

#[tokio::test]
async fn test_unreachable_card_is_rendered_as_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let text = ask(&standard_agent(&server), "hello").await;
    assert!(text.starts_with("Error querying A2A agent: "), "{}", text);
}

fn service_account_key(token_uri: &str) -> String {
    let mut key: Value =
        serde_json::from_str(include_str!("fixtures/service_account.json")).unwrap();
    key["token_uri"] = Value::String(token_uri.to_string());
    key.to_string()
}

#[tokio::test]
async fn test_vertex_engine_over_http_json() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.minted",
            "expires_in": 3600,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let card = json!({
        "name": "engine-agent",
        "url": "https://placeholder.invalid",
        "preferredTransport": "HTTP+JSON",
        "capabilities": {"streaming": false}
    });
    Mock::given(method("GET"))
        .and(path(format!("/v1beta1/{}", ENGINE)))
        .and(header("authorization", "Bearer ya29.minted"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": ENGINE,
            "spec": {"classMethods": [{"a2a_agent_card": card.to_string()}]}
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/v1beta1/{}/a2a/v1/message:send", ENGINE)))
        .and(header("authorization", "Bearer ya29.minted"))
        .and(body_partial_json(json!({
            "message": {"role": "ROLE_USER", "content": [{"text": "status?"}]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {
                "messageId": "m1",
                "role": "ROLE_AGENT",
                "content": [{"text": "all systems nominal"}]
            }
        })))
        .mount(&server)
        .await;

    let store = StaticConnectionStore::default().with_connection(
        "vertex",
        ConnectionInfo::keypair("vertex", service_account_key(&format!("{}/token", server.uri()))),
    );
    let agent = A2AAgent::new(
        "engine",
        A2AAgentConfig::vertexai("vertex", ENGINE),
        Arc::new(store),
    )
    .with_api_root(Some(server.uri()));

    assert_eq!(ask(&agent, "status?").await, "all systems nominal");
}

#[tokio::test]
async fn test_manager_built_from_yaml() {
    let server = MockServer::start().await;
    mount_card(&server, json!({"name": "pong", "url": server.uri()})).await;
    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": "1",
            "result": agent_text("from yaml")
        })))
        .mount(&server)
        .await;

    let yaml = format!(
        r#"
agents:
  remote:
    type: a2a
    config:
      auth_type: api_token
      api_token: secret
      agent_base_url: {}
"#,
        server.uri()
    );
    let config = Config::parse(&yaml).unwrap();

    let mut manager = PluginManager::new(Arc::new(config.connection_store()))
        .with_api_root(config.endpoints.vertex_api_root.clone());
    manager.load_from_config(&config.agents).unwrap();

    let response = manager
        .process("remote", &LlmQuery::from_prompt("hi"), &json!({}), &mut Trace::default())
        .await
        .unwrap();
    assert_eq!(response.text, "from yaml");
}

#[test]
fn test_config_file_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, serde_yaml::to_string(&Config::sample()).unwrap()).unwrap();

    let config = Config::load(&path).unwrap();
    assert!(config.connections.contains_key("vertex"));
    assert_eq!(config.agents.len(), 3);
}

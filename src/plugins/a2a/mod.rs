//! A2A agent adapter
//!
//! Routes a query either to an A2A agent deployed on Vertex AI Agent Engine
//! (credentials from a host connection, card from the engine metadata) or to
//! a standard A2A server (static API token, card from well-known discovery).

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tracing::{error, info, info_span, Instrument, Span};

use crate::application::errors::{AgentError, AgentResult};
use crate::domain::entities::{LlmQuery, QueryResponse, Trace};
use crate::domain::traits::{ConnectionStore, LlmAgent};
use crate::infrastructure::a2a::{
    fetch_standard_agent_card, query_a2a_agent, ClientFactory, ResponseChunk, TransportClientFactory,
};
use crate::infrastructure::gcp::{connection_token, ReasoningEngineClient};
use crate::plugins::trait_def::{A2AAgentConfig, A2ARoute};

/// Text returned when the agent replied without any text part
pub const NO_RESPONSE_TEXT: &str = "No response text received";

const BANNER: &str = "======================================================================";

/// Adapter delegating queries to an A2A agent
pub struct A2AAgent {
    name: String,
    config: A2AAgentConfig,
    connections: Arc<dyn ConnectionStore>,
    factory: Arc<dyn ClientFactory>,
    api_root: Option<String>,
    span: Span,
}

impl A2AAgent {
    pub fn new(
        name: impl Into<String>,
        config: A2AAgentConfig,
        connections: Arc<dyn ConnectionStore>,
    ) -> Self {
        let name = name.into();
        let span = info_span!("a2a_agent", agent = %name);
        Self {
            name,
            config,
            connections,
            factory: Arc::new(TransportClientFactory::default()),
            api_root: None,
            span,
        }
    }

    pub fn with_client_factory(mut self, factory: Arc<dyn ClientFactory>) -> Self {
        self.factory = factory;
        self
    }

    /// Override the Vertex AI API root
    pub fn with_api_root(mut self, api_root: Option<String>) -> Self {
        self.api_root = api_root;
        self
    }

    async fn inference_vertexai(
        &self,
        connection: &str,
        resource_name: &str,
        prompt: &str,
    ) -> AgentResult<(Vec<ResponseChunk>, Vec<String>)> {
        info!("Using Vertex AI A2A Agent");
        info!("Connection: {}", connection);
        info!("Reasoning Engine: {}", resource_name);

        let http = Client::new();
        let token = connection_token(self.connections.as_ref(), connection, &http).await?;

        let card = ReasoningEngineClient::for_request(self.api_root.as_deref())
            .fetch_agent_card(resource_name, &token)
            .await?;

        let client = self.factory.build(&card, &token)?;
        query_a2a_agent(client.as_ref(), prompt).await
    }

    async fn inference_standard(
        &self,
        api_token: &str,
        base_url: &str,
        prompt: &str,
    ) -> AgentResult<(Vec<ResponseChunk>, Vec<String>)> {
        info!("Using Standard A2A Server");
        info!("Agent Base URL: {}", base_url);

        let card = fetch_standard_agent_card(&Client::new(), base_url, api_token).await?;

        let client = self.factory.build(&card, api_token)?;
        query_a2a_agent(client.as_ref(), prompt).await
    }

    /// Run the whole pipeline; errors are returned, not rendered
    pub async fn run(&self, query: &LlmQuery) -> AgentResult<String> {
        let prompt = query
            .prompt()
            .ok_or_else(|| AgentError::config("Query contains no messages"))?;

        info!("{}", BANNER);
        info!("A2A Agent Query");
        info!("{}", BANNER);
        info!("Auth Type: {}", self.config.auth_type.trim());
        info!("Prompt: {}", prompt);

        let (_full_response, response_text) = match self.config.route()? {
            A2ARoute::VertexAi {
                connection,
                resource_name,
            } => self.inference_vertexai(&connection, &resource_name, prompt).await?,
            A2ARoute::Standard { api_token, base_url } => {
                self.inference_standard(&api_token, &base_url, prompt).await?
            }
        };

        let final_response = if response_text.is_empty() {
            NO_RESPONSE_TEXT.to_string()
        } else {
            response_text.join("\n")
        };

        info!("{}", BANNER);
        info!("Agent Response");
        info!("{}", BANNER);
        info!("{}", final_response);
        info!("{}", BANNER);

        Ok(final_response)
    }
}

#[async_trait]
impl LlmAgent for A2AAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "A2A agent - Vertex AI Agent Engine or standard A2A server"
    }

    async fn process(
        &self,
        query: &LlmQuery,
        _settings: &serde_json::Value,
        _trace: &mut Trace,
    ) -> QueryResponse {
        match self.run(query).instrument(self.span.clone()).await {
            Ok(text) => QueryResponse::text(text),
            Err(e) => {
                let error_msg = format!("Error querying A2A agent: {}", e);
                self.span.in_scope(|| error!(kind = e.kind(), "{}", error_msg));
                QueryResponse::text(error_msg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ConnectionInfo;
    use crate::infrastructure::a2a::types::{AgentCard, Message, Part, Role, TransportProtocol};
    use crate::infrastructure::a2a::{A2AClient, ChunkStream};
    use crate::infrastructure::connections::StaticConnectionStore;
    use futures::stream;
    use serde_json::json;
    use std::sync::Mutex;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Factory handing out clients that replay fixed chunks
    struct CannedFactory {
        chunks: Vec<ResponseChunk>,
        tokens: Mutex<Vec<String>>,
    }

    impl CannedFactory {
        fn replying(texts: &[&str]) -> Arc<Self> {
            let chunks = texts
                .iter()
                .map(|text| {
                    ResponseChunk::Message(Message {
                        message_id: uuid::Uuid::new_v4().to_string(),
                        role: Role::Agent,
                        parts: vec![Part::text(*text)],
                        context_id: None,
                        task_id: None,
                    })
                })
                .collect();
            Arc::new(Self {
                chunks,
                tokens: Mutex::new(Vec::new()),
            })
        }
    }

    struct CannedClient(Vec<ResponseChunk>);

    #[async_trait]
    impl A2AClient for CannedClient {
        fn transport(&self) -> TransportProtocol {
            TransportProtocol::HttpJson
        }

        async fn send_message(&self, _message: Message) -> AgentResult<ChunkStream> {
            let chunks: Vec<AgentResult<ResponseChunk>> = self.0.iter().cloned().map(Ok).collect();
            Ok(Box::pin(stream::iter(chunks)))
        }
    }

    impl ClientFactory for CannedFactory {
        fn build(&self, _card: &AgentCard, token: &str) -> AgentResult<Box<dyn A2AClient>> {
            self.tokens.lock().unwrap().push(token.to_string());
            Ok(Box::new(CannedClient(self.chunks.clone())))
        }
    }

    async fn card_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/.well-known/agent-card.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "echo",
                "url": "https://agent.example.com/a2a"
            })))
            .mount(&server)
            .await;
        server
    }

    fn standard_agent(server: &MockServer, factory: Arc<CannedFactory>) -> A2AAgent {
        A2AAgent::new(
            "echo",
            A2AAgentConfig::standard("secret", server.uri()),
            Arc::new(StaticConnectionStore::default()),
        )
        .with_client_factory(factory)
    }

    #[tokio::test]
    async fn test_two_chunks_joined_with_newline() {
        let server = card_server().await;
        let factory = CannedFactory::replying(&["pong-1", "pong-2"]);
        let agent = standard_agent(&server, factory.clone());

        let response = agent
            .process(&LlmQuery::from_prompt("ping"), &json!({}), &mut Trace::default())
            .await;

        assert_eq!(response, QueryResponse::text("pong-1\npong-2"));
        assert_eq!(*factory.tokens.lock().unwrap(), vec!["secret".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_reply_placeholder() {
        let server = card_server().await;
        let agent = standard_agent(&server, CannedFactory::replying(&[]));

        let response = agent
            .process(&LlmQuery::from_prompt("hello"), &json!({}), &mut Trace::default())
            .await;

        assert_eq!(response.text, "No response text received");
    }

    #[tokio::test]
    async fn test_credential_failure_becomes_text() {
        let mut info = ConnectionInfo::oauth("vertex", "unused");
        info.resolved_oauth2_credential = None;
        let store = StaticConnectionStore::default().with_connection("vertex", info);

        let agent = A2AAgent::new(
            "vertex-agent",
            A2AAgentConfig::vertexai("vertex", "projects/p/locations/l/reasoningEngines/1"),
            Arc::new(store),
        )
        .with_client_factory(CannedFactory::replying(&["never"]));

        let response = agent
            .process(&LlmQuery::from_prompt("hello"), &json!({}), &mut Trace::default())
            .await;

        assert_eq!(
            response.text,
            "Error querying A2A agent: No accessToken found in connection. \
             Please refer to DSS OAuth2 credentials documentation."
        );
    }

    #[tokio::test]
    async fn test_vertexai_route() {
        let server = MockServer::start().await;
        let engine = "projects/p1/locations/us-central1/reasoningEngines/42";
        let card = json!({"name": "engine-agent", "url": "http://wrong.example/"}).to_string();
        Mock::given(method("GET"))
            .and(path(format!("/v1beta1/{}", engine)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "spec": {"classMethods": [{"a2a_agent_card": card}]}
            })))
            .mount(&server)
            .await;

        let store = StaticConnectionStore::default()
            .with_connection("vertex", ConnectionInfo::oauth("vertex", "ya29.token"));
        let factory = CannedFactory::replying(&["from engine"]);
        let agent = A2AAgent::new("engine", A2AAgentConfig::vertexai("vertex", engine), Arc::new(store))
            .with_client_factory(factory.clone())
            .with_api_root(Some(server.uri()));

        let response = agent
            .process(&LlmQuery::from_prompt("hi"), &json!({}), &mut Trace::default())
            .await;

        assert_eq!(response.text, "from engine");
        assert_eq!(*factory.tokens.lock().unwrap(), vec!["ya29.token".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_query_becomes_text() {
        let agent = A2AAgent::new(
            "echo",
            A2AAgentConfig::standard("secret", "https://agent.example.com"),
            Arc::new(StaticConnectionStore::default()),
        );
        let response = agent
            .process(&LlmQuery::default(), &json!({}), &mut Trace::default())
            .await;
        assert_eq!(response.text, "Error querying A2A agent: Query contains no messages");
    }
}

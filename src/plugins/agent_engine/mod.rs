//! Vertex AI Agent Engine adapter (non-A2A)
//!
//! Sends the prompt to a reasoning engine's `:query` method.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, info_span, Instrument, Span};

use crate::application::errors::{AgentError, AgentResult};
use crate::domain::entities::{LlmQuery, QueryResponse, Trace};
use crate::domain::traits::{ConnectionStore, LlmAgent};
use crate::infrastructure::gcp::{connection_token, ReasoningEngineClient};
use crate::plugins::trait_def::{required, AgentEngineConfig};

/// Render a `:query` output as text.
///
/// Strings pass through; an object with an `output` key is unwrapped once;
/// anything else is returned as compact JSON.
pub fn render_output(output: &Value) -> String {
    match output {
        Value::String(text) => text.clone(),
        Value::Object(fields) => match fields.get("output") {
            Some(Value::String(text)) => text.clone(),
            Some(inner) => inner.to_string(),
            None => output.to_string(),
        },
        other => other.to_string(),
    }
}

/// Adapter querying a reasoning engine directly
pub struct AgentEngineAgent {
    name: String,
    config: AgentEngineConfig,
    connections: Arc<dyn ConnectionStore>,
    api_root: Option<String>,
    span: Span,
}

impl AgentEngineAgent {
    pub fn new(
        name: impl Into<String>,
        config: AgentEngineConfig,
        connections: Arc<dyn ConnectionStore>,
    ) -> Self {
        let name = name.into();
        let span = info_span!("agent_engine", agent = %name);
        Self {
            name,
            config,
            connections,
            api_root: None,
            span,
        }
    }

    /// Override the Vertex AI API root
    pub fn with_api_root(mut self, api_root: Option<String>) -> Self {
        self.api_root = api_root;
        self
    }

    pub async fn run(&self, query: &LlmQuery) -> AgentResult<String> {
        let connection = required("vertexai_connection", &self.config.vertexai_connection)?;
        let agent_id = required("agent_id", &self.config.agent_id)?;
        let prompt = query
            .prompt()
            .ok_or_else(|| AgentError::config("Query contains no messages"))?;

        info!("Query: {}", prompt);

        let http = Client::new();
        let token = connection_token(self.connections.as_ref(), &connection, &http).await?;

        let output = ReasoningEngineClient::for_request(self.api_root.as_deref())
            .query(&agent_id, json!({ "input": prompt }), &token)
            .await?;

        let text = render_output(&output);
        info!("Agent Response: {}", text);
        Ok(text)
    }
}

#[async_trait]
impl LlmAgent for AgentEngineAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Agent Engine agent - Vertex AI reasoning engine query"
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
                let error_msg = format!("Error querying Agent Engine: {}", e);
                self.span.in_scope(|| error!(kind = e.kind(), "{}", error_msg));
                QueryResponse::text(error_msg)
            }
        }
    }
}

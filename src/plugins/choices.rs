//! Agent choices for configuration dropdowns
//!
//! Lists the reasoning engines of a project/region. Never fails: problems
//! are reported in the `error` or `message` field of the result.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::application::errors::AgentResult;
use crate::domain::traits::ConnectionStore;
use crate::infrastructure::gcp::{connection_token, ReasoningEngine, ReasoningEngineClient};

/// Region used when none is configured
pub const DEFAULT_REGION: &str = "us-central1";

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

/// Form values driving the lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoicesRequest {
    #[serde(default)]
    pub vertexai_connection: Option<String>,
    #[serde(default)]
    pub gcp_project: Option<String>,
    #[serde(default = "default_region")]
    pub gcp_region: String,
}

impl Default for ChoicesRequest {
    fn default() -> Self {
        Self {
            vertexai_connection: None,
            gcp_project: None,
            gcp_region: default_region(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    pub value: String,
}

impl From<&ReasoningEngine> for Choice {
    fn from(engine: &ReasoningEngine) -> Self {
        let value = engine.engine_id().to_string();
        let label = engine
            .display_name
            .clone()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| value.clone());
        Self { label, value }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentChoices {
    pub choices: Vec<Choice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AgentChoices {
    fn error(msg: String) -> Self {
        warn!("{}", msg);
        Self {
            error: Some(msg),
            ..Default::default()
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// List reasoning engines as `{label, value}` choices
pub async fn get_agent_choices(
    request: &ChoicesRequest,
    connections: &dyn ConnectionStore,
    api_root: Option<&str>,
) -> AgentChoices {
    let (connection, project) = match (
        non_empty(&request.vertexai_connection),
        non_empty(&request.gcp_project),
    ) {
        (Some(connection), Some(project)) => (connection, project),
        _ => return AgentChoices::default(),
    };
    let region = request.gcp_region.trim();

    let token = match connection_token(connections, connection, &Client::new()).await {
        Ok(token) => token,
        Err(e) => return AgentChoices::error(format!("Error fetching agents: {}", e)),
    };

    let engines: AgentResult<Vec<ReasoningEngine>> = ReasoningEngineClient::for_request(api_root)
        .list(project, region, &token)
        .await;

    match engines {
        Ok(engines) if engines.is_empty() => AgentChoices {
            message: Some("No agents found in the specified project and region".to_string()),
            ..Default::default()
        },
        Ok(engines) => AgentChoices {
            choices: engines.iter().map(Choice::from).collect(),
            ..Default::default()
        },
        Err(e) => AgentChoices::error(format!(
            "Unable to fetch agents from Vertex AI Agent Engine: {}",
            e
        )),
    }
}

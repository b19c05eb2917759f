//! Adapter configuration records

use serde::{Deserialize, Serialize};

use crate::application::errors::{AgentResult, ConfigError};

/// Value of `auth_type` selecting the Vertex AI path
pub const VERTEXAI_AUTH_TYPE: &str = "vertexai";

fn default_auth_type() -> String {
    VERTEXAI_AUTH_TYPE.to_string()
}

/// Trimmed value of a required field
pub(crate) fn required(field: &str, value: &Option<String>) -> AgentResult<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ConfigError::MissingField(field.to_string()).into())
}

/// Per-agent mapping of an A2A adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct A2AAgentConfig {
    /// `vertexai`, or anything else for a standard A2A server
    #[serde(default = "default_auth_type")]
    pub auth_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertexai_connection: Option<String>,
    /// Full reasoning engine resource name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_engine_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_base_url: Option<String>,
}

impl Default for A2AAgentConfig {
    fn default() -> Self {
        Self {
            auth_type: default_auth_type(),
            vertexai_connection: None,
            reasoning_engine_id: None,
            api_token: None,
            agent_base_url: None,
        }
    }
}

/// Where an A2A adapter sends its queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum A2ARoute {
    VertexAi {
        connection: String,
        resource_name: String,
    },
    Standard {
        api_token: String,
        base_url: String,
    },
}

impl A2AAgentConfig {
    pub fn vertexai(connection: impl Into<String>, resource_name: impl Into<String>) -> Self {
        Self {
            vertexai_connection: Some(connection.into()),
            reasoning_engine_id: Some(resource_name.into()),
            ..Default::default()
        }
    }

    pub fn standard(api_token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            auth_type: "api_token".to_string(),
            api_token: Some(api_token.into()),
            agent_base_url: Some(base_url.into()),
            ..Default::default()
        }
    }

    pub fn route(&self) -> AgentResult<A2ARoute> {
        if self.auth_type.trim() == VERTEXAI_AUTH_TYPE {
            Ok(A2ARoute::VertexAi {
                connection: required("vertexai_connection", &self.vertexai_connection)?,
                resource_name: required("reasoning_engine_id", &self.reasoning_engine_id)?,
            })
        } else {
            Ok(A2ARoute::Standard {
                api_token: required("api_token", &self.api_token)?,
                base_url: required("agent_base_url", &self.agent_base_url)?,
            })
        }
    }
}

/// Per-agent mapping of a Reasoning Engine (non-A2A) adapter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentEngineConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertexai_connection: Option<String>,
    /// Full reasoning engine resource name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
}

/// Adapter kinds that can be declared in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "config", rename_all = "kebab-case")]
pub enum PluginKind {
    /// Agent reached over A2A
    A2a(A2AAgentConfig),
    /// Reasoning engine queried through its `:query` method
    AgentEngine(AgentEngineConfig),
}

/// Adapter information for listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentInfo {
    pub name: String,
    pub description: String,
}

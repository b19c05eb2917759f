//! Configuration management

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::application::errors::ConfigError;
use crate::domain::entities::ConnectionInfo;
use crate::infrastructure::connections::StaticConnectionStore;
use crate::plugins::trait_def::{A2AAgentConfig, AgentEngineConfig, PluginKind, VERTEXAI_AUTH_TYPE};

/// Connector configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub connector: ConnectorConfig,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    /// Host connection descriptors, by name
    #[serde(default)]
    pub connections: HashMap<String, ConnectionInfo>,
    /// Agent adapters, by name
    #[serde(default)]
    pub agents: HashMap<String, PluginKind>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConnectorConfig {
    pub name: String,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            name: "agent-engine-connector".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct EndpointsConfig {
    /// Replaces `https://{location}-aiplatform.googleapis.com`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertex_api_root: Option<String>,
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Every Vertex AI adapter must name a declared connection
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, kind) in &self.agents {
            let connection = match kind {
                PluginKind::A2a(config) if config.auth_type.trim() == VERTEXAI_AUTH_TYPE => {
                    config.vertexai_connection.as_deref()
                }
                PluginKind::AgentEngine(config) => config.vertexai_connection.as_deref(),
                PluginKind::A2a(_) => None,
            };
            if let Some(connection) = connection.map(str::trim) {
                if !self.connections.contains_key(connection) {
                    return Err(ConfigError::InvalidValue(format!(
                        "agent '{}' uses unknown connection '{}'",
                        name, connection
                    )));
                }
            }
        }
        Ok(())
    }

    /// Connection store serving the declared connections
    pub fn connection_store(&self) -> StaticConnectionStore {
        StaticConnectionStore::new(self.connections.clone())
    }

    pub fn load_env() -> Self {
        // Load from environment variables
        let mut config = Config::default();

        if let (Ok(token), Ok(base_url)) = (
            std::env::var("A2A_API_TOKEN"),
            std::env::var("A2A_AGENT_BASE_URL"),
        ) {
            config.agents.insert(
                "a2a".to_string(),
                PluginKind::A2a(A2AAgentConfig::standard(token, base_url)),
            );
        }

        if let Ok(root) = std::env::var("VERTEX_API_ROOT") {
            config.endpoints.vertex_api_root = Some(root);
        }

        config
    }

    /// Starter configuration written by `init-config`
    pub fn sample() -> Self {
        let mut config = Config::default();

        config.connections.insert(
            "vertex".to_string(),
            ConnectionInfo::oauth("vertex", "<access token>"),
        );
        config.agents.insert(
            "vertex-a2a".to_string(),
            PluginKind::A2a(A2AAgentConfig::vertexai(
                "vertex",
                "projects/PROJECT/locations/us-central1/reasoningEngines/ENGINE_ID",
            )),
        );
        config.agents.insert(
            "remote-a2a".to_string(),
            PluginKind::A2a(A2AAgentConfig::standard("<api token>", "https://agent.example.com")),
        );
        config.agents.insert(
            "vertex-engine".to_string(),
            PluginKind::AgentEngine(AgentEngineConfig {
                vertexai_connection: Some("vertex".to_string()),
                agent_id: Some(
                    "projects/PROJECT/locations/us-central1/reasoningEngines/ENGINE_ID".to_string(),
                ),
            }),
        );

        config
    }
}

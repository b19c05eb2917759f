//! Plugin manager - builds adapters from configuration and dispatches queries

use crate::application::errors::{AgentError, AgentResult};
use crate::domain::entities::{LlmQuery, QueryResponse, Trace};
use crate::domain::traits::{ConnectionStore, LlmAgent};
use crate::plugins::a2a::A2AAgent;
use crate::plugins::agent_engine::AgentEngineAgent;
use crate::plugins::trait_def::{AgentInfo, PluginKind};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Manages every configured agent adapter
pub struct PluginManager {
    agents: HashMap<String, Arc<dyn LlmAgent>>,
    connections: Arc<dyn ConnectionStore>,
    api_root: Option<String>,
}

impl PluginManager {
    /// Create a manager whose adapters resolve connections from `connections`
    pub fn new(connections: Arc<dyn ConnectionStore>) -> Self {
        Self {
            agents: HashMap::new(),
            connections,
            api_root: None,
        }
    }

    /// Vertex AI API root handed to adapters built by `load_from_config`
    pub fn with_api_root(mut self, api_root: Option<String>) -> Self {
        self.api_root = api_root;
        self
    }

    /// Register an adapter
    pub fn register<A: LlmAgent + 'static>(&mut self, agent: A) -> AgentResult<()> {
        let name = agent.name().to_string();

        if self.agents.contains_key(&name) {
            return Err(AgentError::config(format!("Agent '{}' already registered", name)));
        }

        info!("Registering agent: {}", name);
        self.agents.insert(name, Arc::new(agent));
        Ok(())
    }

    /// Unregister an adapter
    pub fn unregister(&mut self, name: &str) -> AgentResult<()> {
        if self.agents.remove(name).is_some() {
            info!("Unregistered agent: {}", name);
            Ok(())
        } else {
            Err(AgentError::config(format!("Agent '{}' not found", name)))
        }
    }

    /// Answer a query with the named adapter
    pub async fn process(
        &self,
        name: &str,
        query: &LlmQuery,
        settings: &serde_json::Value,
        trace: &mut Trace,
    ) -> AgentResult<QueryResponse> {
        match self.agents.get(name) {
            Some(agent) => Ok(agent.process(query, settings, trace).await),
            None => {
                warn!("Agent '{}' not found", name);
                Err(AgentError::config(format!("Agent '{}' not found", name)))
            }
        }
    }

    /// List all registered adapters, sorted by name
    pub fn list_agents(&self) -> Vec<AgentInfo> {
        let mut agents: Vec<AgentInfo> = self
            .agents
            .iter()
            .map(|(name, agent)| AgentInfo {
                name: name.clone(),
                description: agent.description().to_string(),
            })
            .collect();
        agents.sort_by(|a, b| a.name.cmp(&b.name));
        agents
    }

    /// Check if an adapter exists
    pub fn has_agent(&self, name: &str) -> bool {
        self.agents.contains_key(name)
    }

    /// Build and register one adapter per configured entry
    pub fn load_from_config(&mut self, agents: &HashMap<String, PluginKind>) -> AgentResult<()> {
        for (name, kind) in agents {
            match kind {
                PluginKind::A2a(config) => {
                    info!("Loading A2A agent: {}", name);
                    let agent = A2AAgent::new(name.clone(), config.clone(), self.connections.clone())
                        .with_api_root(self.api_root.clone());
                    self.register(agent)?;
                }
                PluginKind::AgentEngine(config) => {
                    info!("Loading Agent Engine agent: {}", name);
                    let agent =
                        AgentEngineAgent::new(name.clone(), config.clone(), self.connections.clone())
                            .with_api_root(self.api_root.clone());
                    self.register(agent)?;
                }
            }
        }
        Ok(())
    }
}

//! Agent adapters
//!
//! Each adapter implements `LlmAgent` on top of one pipeline:
//! credentials, agent card, client, query, text.

pub mod manager;
pub mod trait_def;
pub mod a2a;
pub mod agent_engine;
pub mod choices;

pub use manager::PluginManager;
pub use trait_def::{A2AAgentConfig, AgentEngineConfig, AgentInfo, PluginKind};
pub use a2a::A2AAgent;
pub use agent_engine::AgentEngineAgent;
pub use choices::{get_agent_choices, AgentChoices, ChoicesRequest};

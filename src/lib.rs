//! Agent adapters for Vertex AI Agent Engine and A2A agents

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod plugins;

pub use application::errors::{AgentError, AgentResult, ConfigError};
pub use domain::entities::{ConnectionInfo, LlmQuery, QueryResponse, Trace};
pub use domain::traits::{ConnectionStore, LlmAgent};
pub use infrastructure::config::Config;
pub use plugins::{A2AAgent, AgentEngineAgent, PluginManager};

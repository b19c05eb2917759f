//! Application layer errors

use thiserror::Error;

/// Errors raised anywhere in an agent pipeline.
///
/// `Display` yields only the message, so adapters can embed it directly in
/// their fallback text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    /// Missing or invalid connection / agent fields
    #[error("{0}")]
    Configuration(String),

    /// Credential refresh failed
    #[error("{0}")]
    Auth(String),

    /// HTTP transport failure or non-2xx status
    #[error("{0}")]
    Network(String),

    /// Malformed agent card or unexpected response shape
    #[error("{0}")]
    Parse(String),
}

impl AgentError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Short name of the error kind, used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            AgentError::Configuration(_) => "configuration",
            AgentError::Auth(_) => "auth",
            AgentError::Network(_) => "network",
            AgentError::Parse(_) => "parse",
        }
    }
}

impl From<reqwest::Error> for AgentError {
    fn from(e: reqwest::Error) -> Self {
        AgentError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for AgentError {
    fn from(e: serde_json::Error) -> Self {
        AgentError::Parse(e.to_string())
    }
}

/// Result type for pipeline operations
pub type AgentResult<T> = Result<T, AgentError>;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<ConfigError> for AgentError {
    fn from(e: ConfigError) -> Self {
        AgentError::Configuration(e.to_string())
    }
}

use serde::{Deserialize, Serialize};

/// One message of a host query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryMessage {
    /// Role: "system", "user", or "assistant"
    #[serde(default = "default_role")]
    pub role: String,
    /// Message content
    #[serde(default)]
    pub content: String,
}

fn default_role() -> String {
    "user".to_string()
}

impl QueryMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Inference request handed over by the host framework
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmQuery {
    pub messages: Vec<QueryMessage>,
}

impl LlmQuery {
    pub fn new(messages: Vec<QueryMessage>) -> Self {
        Self { messages }
    }

    /// Single-message query
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self::new(vec![QueryMessage::user(prompt)])
    }

    /// Content of the last message. Earlier turns are not forwarded.
    pub fn prompt(&self) -> Option<&str> {
        self.messages.last().map(|m| m.content.as_str())
    }
}

/// Single-field result returned to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub text: String,
}

impl QueryResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Host trace handle. Accepted by adapters, not written to.
#[derive(Debug, Clone, Default)]
pub struct Trace {
    pub name: String,
}

impl Trace {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

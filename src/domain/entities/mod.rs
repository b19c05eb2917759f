//! Domain entities - Records exchanged with the host framework

pub mod query;
pub mod connection;

pub use query::{LlmQuery, QueryMessage, QueryResponse, Trace};
pub use connection::{AuthType, ConnectionInfo, ConnectionParams, OAuth2Credential};

//! Google Cloud: credentials and the Reasoning Engine API

pub mod credentials;
pub mod reasoning_engine;

pub use credentials::{connection_token, resolve_credentials, Credential, ServiceAccountCredential, ServiceAccountKey};
pub use reasoning_engine::{ReasoningEngine, ReasoningEngineClient, ReasoningEngineName};

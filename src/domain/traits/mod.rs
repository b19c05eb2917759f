//! Domain traits - Abstractions implemented by adapters and the host

pub mod agent;
pub mod connections;

pub use agent::LlmAgent;
pub use connections::ConnectionStore;

//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Connections: Host connection descriptors
//! - GCP: Service-account credentials and the Vertex AI reasoning engine API
//! - A2A: Agent cards, transports and streaming replies

pub mod config;
pub mod connections;
pub mod gcp;
pub mod a2a;

//! A2A (Agent-to-Agent) client side
//!
//! Card discovery, transport-bound clients, and reply flattening.

pub mod types;
pub mod client;
pub mod sse;
pub mod jsonrpc;
pub mod rest;
pub mod factory;
pub mod card_resolver;
pub mod query;

pub use types::{AgentCard, Message, Part, ResponseChunk, TransportProtocol};
pub use client::{A2AClient, ChunkStream};
pub use factory::{build_client, ClientFactory, TransportClientFactory};
pub use card_resolver::fetch_standard_agent_card;
pub use query::query_a2a_agent;

//! A2A client abstraction

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

use crate::application::errors::AgentResult;
use crate::infrastructure::a2a::types::{Message, ResponseChunk, TransportProtocol};

/// Lazy, finite reply stream. Not restartable.
pub type ChunkStream = Pin<Box<dyn Stream<Item = AgentResult<ResponseChunk>> + Send>>;

/// Client bound to one agent endpoint and one bearer token
#[async_trait]
pub trait A2AClient: Send + Sync {
    /// Transport this client speaks
    fn transport(&self) -> TransportProtocol;

    /// Send one message; the reply may arrive as one or several chunks
    async fn send_message(&self, message: Message) -> AgentResult<ChunkStream>;
}

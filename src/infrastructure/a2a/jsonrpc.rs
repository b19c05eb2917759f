//! JSON-RPC transport (`message/send`, `message/stream`)

use async_trait::async_trait;
use futures::{stream, StreamExt};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::application::errors::{AgentError, AgentResult};
use crate::infrastructure::a2a::client::{A2AClient, ChunkStream};
use crate::infrastructure::a2a::sse;
use crate::infrastructure::a2a::types::{
    JsonRpcRequest, JsonRpcResponse, Message, ResponseChunk, TransportProtocol,
};

/// Outbound message with its `kind` discriminator
#[derive(Serialize)]
struct OutboundMessage<'a> {
    kind: &'static str,
    #[serde(flatten)]
    message: &'a Message,
}

#[derive(Serialize)]
struct SendConfiguration {
    blocking: bool,
}

#[derive(Serialize)]
struct MessageSendParams<'a> {
    message: OutboundMessage<'a>,
    configuration: SendConfiguration,
}

/// Client for agents served over JSON-RPC 2.0
pub struct JsonRpcClient {
    http: Client,
    url: String,
    streaming: bool,
}

impl JsonRpcClient {
    /// `http` must already carry the authorization header
    pub fn new(http: Client, url: impl Into<String>, streaming: bool) -> Self {
        Self {
            http,
            url: url.into(),
            streaming,
        }
    }

    fn request<'a>(
        &self,
        method: &'static str,
        message: &'a Message,
    ) -> JsonRpcRequest<MessageSendParams<'a>> {
        JsonRpcRequest::new(
            method,
            MessageSendParams {
                message: OutboundMessage {
                    kind: "message",
                    message,
                },
                configuration: SendConfiguration { blocking: true },
            },
        )
    }
}

/// Unwrap a JSON-RPC envelope into a reply chunk
fn chunk_from_envelope(envelope: JsonRpcResponse) -> AgentResult<ResponseChunk> {
    if let Some(error) = envelope.error {
        return Err(AgentError::network(format!(
            "A2A agent returned error {}: {}",
            error.code, error.message
        )));
    }
    let result = envelope
        .result
        .ok_or_else(|| AgentError::parse("A2A response carries neither result nor error"))?;
    Ok(serde_json::from_value(result)?)
}

#[async_trait]
impl A2AClient for JsonRpcClient {
    fn transport(&self) -> TransportProtocol {
        TransportProtocol::JsonRpc
    }

    async fn send_message(&self, message: Message) -> AgentResult<ChunkStream> {
        let method = if self.streaming { "message/stream" } else { "message/send" };
        debug!("POST {} ({})", self.url, method);

        let mut builder = self.http.post(&self.url).json(&self.request(method, &message));
        if self.streaming {
            builder = builder.header(ACCEPT, "text/event-stream");
        }
        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::network(format!(
                "A2A request failed with status {}: {}",
                status, body
            )));
        }

        if self.streaming {
            let chunks = sse::data_events(response).map(|data| {
                let envelope: JsonRpcResponse = serde_json::from_str(&data?)?;
                chunk_from_envelope(envelope)
            });
            Ok(Box::pin(chunks))
        } else {
            let envelope: JsonRpcResponse = response
                .json()
                .await
                .map_err(|e| AgentError::parse(format!("Malformed A2A response: {}", e)))?;
            let chunk = chunk_from_envelope(envelope)?;
            Ok(Box::pin(stream::once(async move { Ok(chunk) })))
        }
    }
}

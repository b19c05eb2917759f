//! Single-message query and reply flattening

use futures::StreamExt;
use tracing::info;

use crate::application::errors::AgentResult;
use crate::infrastructure::a2a::client::A2AClient;
use crate::infrastructure::a2a::types::{Message, ResponseChunk};

/// Append the text of every text part carried by `chunk`
pub fn collect_text(chunk: &ResponseChunk, fragments: &mut Vec<String>) {
    if let Some(message) = chunk.reply_message() {
        fragments.extend(message.parts.iter().filter_map(|p| p.as_text()).map(str::to_string));
    }
}

/// Send `prompt` as one user message and drain the reply.
///
/// Returns every chunk received plus the text fragments in chunk-then-part
/// order. A failure mid-stream drops whatever was collected so far.
pub async fn query_a2a_agent(
    client: &dyn A2AClient,
    prompt: &str,
) -> AgentResult<(Vec<ResponseChunk>, Vec<String>)> {
    info!("Query: {}", prompt);

    let message = Message::user_text(prompt);

    info!("Sending message to A2A agent...");
    let mut stream = client.send_message(message).await?;

    let mut full_response = Vec::new();
    let mut response_text = Vec::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        collect_text(&chunk, &mut response_text);
        full_response.push(chunk);
    }

    info!("Response received ({} chunks)", full_response.len());

    Ok((full_response, response_text))
}

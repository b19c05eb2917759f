//! HTTP+JSON transport (`/v1/message:send`, `/v1/message:stream`)
//!
//! Payloads follow the protobuf JSON mapping: parts live under `content`,
//! roles are `ROLE_USER` / `ROLE_AGENT`, and responses wrap their payload in
//! a single named field.

use async_trait::async_trait;
use futures::{stream, StreamExt};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::errors::{AgentError, AgentResult};
use crate::infrastructure::a2a::client::{A2AClient, ChunkStream};
use crate::infrastructure::a2a::sse;
use crate::infrastructure::a2a::types::{
    Artifact, DataPart, FilePart, Message, Part, ResponseChunk, Role, Task, TaskArtifactUpdateEvent,
    TaskStatus, TaskStatusUpdateEvent, TextPart, TransportProtocol,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RestPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
}

impl From<&Part> for RestPart {
    fn from(part: &Part) -> Self {
        match part {
            Part::Text(p) => RestPart {
                text: Some(p.text.clone()),
                ..Default::default()
            },
            Part::File(p) => RestPart {
                file: Some(p.file.clone()),
                ..Default::default()
            },
            Part::Data(p) => RestPart {
                data: Some(p.data.clone()),
                ..Default::default()
            },
            Part::Other => RestPart::default(),
        }
    }
}

impl From<RestPart> for Part {
    fn from(part: RestPart) -> Self {
        if let Some(text) = part.text {
            Part::Text(TextPart { text })
        } else if let Some(file) = part.file {
            Part::File(FilePart { file })
        } else if let Some(data) = part.data {
            Part::Data(DataPart { data })
        } else {
            Part::Other
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestMessage {
    message_id: String,
    #[serde(default)]
    role: String,
    #[serde(default)]
    content: Vec<RestPart>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    context_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    task_id: Option<String>,
}

impl From<&Message> for RestMessage {
    fn from(message: &Message) -> Self {
        let role = match message.role {
            Role::User => "ROLE_USER",
            Role::Agent => "ROLE_AGENT",
        };
        Self {
            message_id: message.message_id.clone(),
            role: role.to_string(),
            content: message.parts.iter().map(RestPart::from).collect(),
            context_id: message.context_id.clone(),
            task_id: message.task_id.clone(),
        }
    }
}

impl From<RestMessage> for Message {
    fn from(message: RestMessage) -> Self {
        let role = match message.role.as_str() {
            "ROLE_AGENT" | "agent" => Role::Agent,
            _ => Role::User,
        };
        Self {
            message_id: message.message_id,
            role,
            parts: message.content.into_iter().map(Part::from).collect(),
            context_id: message.context_id,
            task_id: message.task_id,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestStatus {
    #[serde(default)]
    state: String,
    #[serde(default, alias = "update")]
    message: Option<RestMessage>,
    #[serde(default)]
    timestamp: Option<String>,
}

impl From<RestStatus> for TaskStatus {
    fn from(status: RestStatus) -> Self {
        Self {
            state: status.state,
            message: status.message.map(Message::from),
            timestamp: status.timestamp,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestArtifact {
    #[serde(default)]
    artifact_id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    parts: Vec<RestPart>,
}

impl From<RestArtifact> for Artifact {
    fn from(artifact: RestArtifact) -> Self {
        Self {
            artifact_id: artifact.artifact_id,
            name: artifact.name,
            parts: artifact.parts.into_iter().map(Part::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestTask {
    id: String,
    #[serde(default)]
    context_id: String,
    status: RestStatus,
    #[serde(default)]
    artifacts: Vec<RestArtifact>,
    #[serde(default)]
    history: Vec<RestMessage>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestStatusUpdate {
    task_id: String,
    #[serde(default)]
    context_id: String,
    status: RestStatus,
    #[serde(rename = "final", default)]
    is_final: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestArtifactUpdate {
    task_id: String,
    #[serde(default)]
    context_id: String,
    artifact: RestArtifact,
}

/// Body of a send response or of one stream event
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestResponse {
    #[serde(default, alias = "msg")]
    message: Option<RestMessage>,
    #[serde(default)]
    task: Option<RestTask>,
    #[serde(default)]
    status_update: Option<RestStatusUpdate>,
    #[serde(default)]
    artifact_update: Option<RestArtifactUpdate>,
}

impl From<RestResponse> for ResponseChunk {
    fn from(response: RestResponse) -> Self {
        if let Some(message) = response.message {
            ResponseChunk::Message(message.into())
        } else if let Some(task) = response.task {
            ResponseChunk::Task(Task {
                id: task.id,
                context_id: task.context_id,
                status: task.status.into(),
                artifacts: task.artifacts.into_iter().map(Artifact::from).collect(),
                history: task.history.into_iter().map(Message::from).collect(),
            })
        } else if let Some(update) = response.status_update {
            ResponseChunk::StatusUpdate(TaskStatusUpdateEvent {
                task_id: update.task_id,
                context_id: update.context_id,
                status: update.status.into(),
                is_final: update.is_final,
            })
        } else if let Some(update) = response.artifact_update {
            ResponseChunk::ArtifactUpdate(TaskArtifactUpdateEvent {
                task_id: update.task_id,
                context_id: update.context_id,
                artifact: update.artifact.into(),
            })
        } else {
            ResponseChunk::Other
        }
    }
}

#[derive(Serialize)]
struct SendConfiguration {
    blocking: bool,
}

#[derive(Serialize)]
struct SendMessageRequest {
    message: RestMessage,
    configuration: SendConfiguration,
}

/// Client for agents served over HTTP+JSON
pub struct RestClient {
    http: Client,
    base_url: String,
    streaming: bool,
}

impl RestClient {
    /// `http` must already carry the authorization header
    pub fn new(http: Client, base_url: impl Into<String>, streaming: bool) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            streaming,
        }
    }

    fn endpoint(&self) -> String {
        let action = if self.streaming { "stream" } else { "send" };
        format!("{}/v1/message:{}", self.base_url, action)
    }
}

#[async_trait]
impl A2AClient for RestClient {
    fn transport(&self) -> TransportProtocol {
        TransportProtocol::HttpJson
    }

    async fn send_message(&self, message: Message) -> AgentResult<ChunkStream> {
        let url = self.endpoint();
        debug!("POST {}", url);

        let body = SendMessageRequest {
            message: RestMessage::from(&message),
            configuration: SendConfiguration { blocking: true },
        };

        let mut builder = self.http.post(&url).json(&body);
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
                let event: RestResponse = serde_json::from_str(&data?)?;
                Ok(ResponseChunk::from(event))
            });
            Ok(Box::pin(chunks))
        } else {
            let reply: RestResponse = response
                .json()
                .await
                .map_err(|e| AgentError::parse(format!("Malformed A2A response: {}", e)))?;
            let chunk = ResponseChunk::from(reply);
            Ok(Box::pin(stream::once(async move { Ok(chunk) })))
        }
    }
}

//! Builds transport-bound clients from agent cards

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use tracing::info;

use crate::application::errors::{AgentError, AgentResult};
use crate::infrastructure::a2a::client::A2AClient;
use crate::infrastructure::a2a::jsonrpc::JsonRpcClient;
use crate::infrastructure::a2a::rest::RestClient;
use crate::infrastructure::a2a::types::{AgentCard, AgentInterface, TransportProtocol};

/// Turns an agent card plus bearer token into a client
pub trait ClientFactory: Send + Sync {
    fn build(&self, card: &AgentCard, token: &str) -> AgentResult<Box<dyn A2AClient>>;
}

/// HTTP client whose every request carries the bearer token
pub fn authorized_http_client(token: &str) -> AgentResult<Client> {
    let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|_| AgentError::config("Bearer token contains invalid header characters"))?;
    auth.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, auth);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Client::builder()
        .default_headers(headers)
        .build()
        .map_err(|e| AgentError::config(format!("Unable to build HTTP client: {}", e)))
}

/// Default factory: HTTP+JSON when offered, JSON-RPC otherwise
pub struct TransportClientFactory {
    preference: Vec<TransportProtocol>,
}

impl TransportClientFactory {
    pub fn new(preference: Vec<TransportProtocol>) -> Self {
        Self { preference }
    }

    /// First card interface matching the preference order
    pub fn select_interface(&self, card: &AgentCard) -> Option<AgentInterface> {
        let interfaces = card.interfaces();
        self.preference.iter().find_map(|wanted| {
            interfaces
                .iter()
                .find(|interface| interface.transport == *wanted)
                .cloned()
        })
    }
}

impl Default for TransportClientFactory {
    fn default() -> Self {
        Self::new(vec![TransportProtocol::HttpJson, TransportProtocol::JsonRpc])
    }
}

impl ClientFactory for TransportClientFactory {
    fn build(&self, card: &AgentCard, token: &str) -> AgentResult<Box<dyn A2AClient>> {
        let interface = self.select_interface(card).ok_or_else(|| {
            AgentError::config(format!(
                "Agent '{}' offers no supported transport",
                card.name
            ))
        })?;

        let http = authorized_http_client(token)?;
        let streaming = card.supports_streaming();

        let client: Box<dyn A2AClient> = match interface.transport {
            TransportProtocol::HttpJson => Box::new(RestClient::new(http, interface.url, streaming)),
            TransportProtocol::JsonRpc => Box::new(JsonRpcClient::new(http, interface.url, streaming)),
            TransportProtocol::Grpc | TransportProtocol::Unknown => {
                return Err(AgentError::config(format!(
                    "Transport {:?} is not supported",
                    interface.transport
                )))
            }
        };

        info!("A2A client created ({:?}, streaming: {})", client.transport(), streaming);
        Ok(client)
    }
}

/// Build a client with the default transport preference
pub fn build_client(card: &AgentCard, token: &str) -> AgentResult<Box<dyn A2AClient>> {
    TransportClientFactory::default().build(card, token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn card(value: serde_json::Value) -> AgentCard {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_prefers_http_json() {
        let card = card(json!({
            "name": "echo",
            "url": "https://agent.example.com/rpc",
            "additionalInterfaces": [{"url": "https://agent.example.com/rest", "transport": "HTTP+JSON"}]
        }));
        let client = build_client(&card, "token").unwrap();
        assert_eq!(client.transport(), TransportProtocol::HttpJson);
    }

    #[test]
    fn test_falls_back_to_jsonrpc() {
        let card = card(json!({"name": "echo", "url": "https://agent.example.com/rpc"}));
        let client = build_client(&card, "token").unwrap();
        assert_eq!(client.transport(), TransportProtocol::JsonRpc);
    }

    #[test]
    fn test_grpc_only_card_rejected() {
        let card = card(json!({
            "name": "grpc-agent",
            "url": "agent.example.com:443",
            "preferredTransport": "GRPC"
        }));
        let err = build_client(&card, "token").err().unwrap();
        assert_eq!(
            err,
            AgentError::Configuration("Agent 'grpc-agent' offers no supported transport".to_string())
        );
    }

    #[test]
    fn test_invalid_token_rejected() {
        assert!(matches!(
            authorized_http_client("bad\ntoken"),
            Err(AgentError::Configuration(_))
        ));
    }
}

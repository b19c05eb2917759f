//! Vertex AI Reasoning Engine REST client

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use tracing::{debug, info};

use crate::application::errors::{AgentError, AgentResult};
use crate::infrastructure::a2a::types::AgentCard;

/// Parsed `projects/{p}/locations/{l}/reasoningEngines/{id}` resource name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasoningEngineName {
    pub project: String,
    pub location: String,
    pub engine_id: String,
}

impl ReasoningEngineName {
    pub fn new(
        project: impl Into<String>,
        location: impl Into<String>,
        engine_id: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            location: location.into(),
            engine_id: engine_id.into(),
        }
    }

    /// Accepts bare names and full URLs containing the three segments
    pub fn parse(resource_name: &str) -> AgentResult<Self> {
        let segments: Vec<&str> = resource_name.split('/').collect();
        let after = |key: &str| -> Option<String> {
            let index = segments.iter().position(|s| *s == key)?;
            segments
                .get(index + 1)
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
        };

        match (after("projects"), after("locations"), after("reasoningEngines")) {
            (Some(project), Some(location), Some(engine_id)) => Ok(Self {
                project,
                location,
                engine_id,
            }),
            _ => Err(AgentError::config(format!(
                "Invalid reasoning engine resource name '{}': expected \
                 projects/PROJECT/locations/LOCATION/reasoningEngines/ID",
                resource_name
            ))),
        }
    }
}

impl fmt::Display for ReasoningEngineName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "projects/{}/locations/{}/reasoningEngines/{}",
            self.project, self.location, self.engine_id
        )
    }
}

/// Entry of a reasoning engine listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasoningEngine {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl ReasoningEngine {
    /// Last segment of the resource name
    pub fn engine_id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListReasoningEnginesResponse {
    #[serde(default)]
    reasoning_engines: Vec<ReasoningEngine>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryReasoningEngineResponse {
    #[serde(default)]
    output: Value,
}

/// Reasoning Engine API client. One per request; holds no auth state.
#[derive(Debug, Clone)]
pub struct ReasoningEngineClient {
    http: Client,
    api_root: Option<String>,
}

impl ReasoningEngineClient {
    pub fn new(http: Client) -> Self {
        Self { http, api_root: None }
    }

    /// Fresh client for one request, honouring an optional root override
    pub fn for_request(api_root: Option<&str>) -> Self {
        let client = Self::new(Client::new());
        match api_root {
            Some(root) => client.with_api_root(root),
            None => client,
        }
    }

    /// Replace the regional `https://{location}-aiplatform.googleapis.com` root
    pub fn with_api_root(mut self, api_root: impl Into<String>) -> Self {
        self.api_root = Some(api_root.into().trim_end_matches('/').to_string());
        self
    }

    fn root(&self, location: &str) -> String {
        match &self.api_root {
            Some(root) => root.clone(),
            None => format!("https://{}-aiplatform.googleapis.com", location),
        }
    }

    /// v1beta1 metadata URL of an engine
    pub fn metadata_url(&self, name: &ReasoningEngineName) -> String {
        format!("{}/v1beta1/{}", self.root(&name.location), name)
    }

    /// A2A endpoint actually served for an engine
    pub fn a2a_url(&self, name: &ReasoningEngineName) -> String {
        format!("{}/a2a", self.metadata_url(name))
    }

    async fn check(response: reqwest::Response, what: &str) -> AgentResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(AgentError::network(format!(
            "{} failed with status {}: {}",
            what, status, body
        )))
    }

    /// Fetch the agent card embedded in an engine's class methods.
    ///
    /// The embedded card's `url` is replaced by the engine's A2A endpoint.
    pub async fn fetch_agent_card(&self, resource_name: &str, token: &str) -> AgentResult<AgentCard> {
        let name = ReasoningEngineName::parse(resource_name)?;
        let endpoint = self.metadata_url(&name);

        info!("Fetching agent card from Vertex AI: {}", endpoint);

        let response = self.http.get(&endpoint).bearer_auth(token).send().await?;
        let metadata: Value = Self::check(response, "Reasoning engine lookup")
            .await?
            .json()
            .await
            .map_err(|e| AgentError::parse(format!("Malformed reasoning engine response: {}", e)))?;

        let mut card = embedded_agent_card(&metadata)?;
        if let Some(fields) = card.as_object_mut() {
            fields.insert("url".to_string(), Value::String(self.a2a_url(&name)));
        }

        let card: AgentCard = serde_json::from_value(card)
            .map_err(|e| AgentError::parse(format!("Invalid agent card: {}", e)))?;

        info!("Agent card retrieved from Vertex AI");
        info!("Agent name: {}", card.name);
        info!("Agent URL: {}", card.url);

        Ok(card)
    }

    /// List every engine under a project and region, following pagination
    pub async fn list(&self, project: &str, location: &str, token: &str) -> AgentResult<Vec<ReasoningEngine>> {
        let url = format!(
            "{}/v1/projects/{}/locations/{}/reasoningEngines",
            self.root(location),
            project,
            location
        );

        let mut engines = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut request = self.http.get(&url).bearer_auth(token);
            if let Some(page) = &page_token {
                request = request.query(&[("pageToken", page)]);
            }
            debug!("GET {} (page token: {:?})", url, page_token);

            let page: ListReasoningEnginesResponse = Self::check(request.send().await?, "Reasoning engine listing")
                .await?
                .json()
                .await
                .map_err(|e| AgentError::parse(format!("Malformed listing response: {}", e)))?;

            engines.extend(page.reasoning_engines);
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        Ok(engines)
    }

    /// Run a synchronous query against an engine; returns its `output` field
    pub async fn query(&self, resource_name: &str, input: Value, token: &str) -> AgentResult<Value> {
        let name = ReasoningEngineName::parse(resource_name)?;
        let url = format!("{}/v1/{}:query", self.root(&name.location), name);

        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&serde_json::json!({ "input": input }))
            .send()
            .await?;

        let reply: QueryReasoningEngineResponse = Self::check(response, "Reasoning engine query")
            .await?
            .json()
            .await
            .map_err(|e| AgentError::parse(format!("Malformed query response: {}", e)))?;

        Ok(reply.output)
    }
}

/// First `a2a_agent_card` found in `spec.classMethods`, as JSON
fn embedded_agent_card(metadata: &Value) -> AgentResult<Value> {
    let embedded = metadata
        .pointer("/spec/classMethods")
        .and_then(Value::as_array)
        .and_then(|methods| methods.iter().find_map(|m| m.get("a2a_agent_card")));

    match embedded {
        Some(Value::String(raw)) if !raw.is_empty() => serde_json::from_str(raw)
            .map_err(|e| AgentError::parse(format!("Invalid agent card JSON: {}", e))),
        Some(card @ Value::Object(_)) => Ok(card.clone()),
        _ => Err(AgentError::config(
            "Could not find A2A agent card in reasoning engine response",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ENGINE: &str = "projects/p1/locations/us-central1/reasoningEngines/42";

    fn metadata_with_card(card: &Value) -> Value {
        json!({
            "name": ENGINE,
            "spec": {
                "classMethods": [
                    {"name": "query", "api_mode": ""},
                    {"name": "on_message_send", "a2a_agent_card": card.to_string()}
                ]
            }
        })
    }

    #[test]
    fn test_parse_resource_name() {
        let name = ReasoningEngineName::parse(ENGINE).unwrap();
        assert_eq!(name, ReasoningEngineName::new("p1", "us-central1", "42"));
        assert_eq!(name.to_string(), ENGINE);
    }

    #[test]
    fn test_parse_rejects_missing_segments() {
        for bad in ["42", "projects/p1/locations/us-central1", "projects//locations/l/reasoningEngines/1"] {
            let err = ReasoningEngineName::parse(bad).unwrap_err();
            assert!(matches!(err, AgentError::Configuration(_)), "{}", bad);
        }
    }

    #[test]
    fn test_default_endpoints() {
        let client = ReasoningEngineClient::new(Client::new());
        let name = ReasoningEngineName::parse(ENGINE).unwrap();
        assert_eq!(
            client.a2a_url(&name),
            "https://us-central1-aiplatform.googleapis.com/v1beta1/projects/p1/locations/us-central1/reasoningEngines/42/a2a"
        );
    }

    #[test]
    fn test_embedded_card_missing() {
        let metadata = json!({"spec": {"classMethods": [{"name": "query"}]}});
        let err = embedded_agent_card(&metadata).unwrap_err();
        assert_eq!(
            err,
            AgentError::Configuration("Could not find A2A agent card in reasoning engine response".to_string())
        );
    }

    #[tokio::test]
    async fn test_card_url_is_corrected() {
        let server = MockServer::start().await;
        let embedded = json!({
            "name": "Currency Agent",
            "url": "http://localhost:8080/",
            "preferredTransport": "HTTP+JSON",
            "capabilities": {"streaming": false}
        });
        Mock::given(method("GET"))
            .and(path(format!("/v1beta1/{}", ENGINE)))
            .and(header("authorization", "Bearer ya29.token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(metadata_with_card(&embedded)))
            .mount(&server)
            .await;

        let client = ReasoningEngineClient::new(Client::new()).with_api_root(server.uri());
        let card = client.fetch_agent_card(ENGINE, "ya29.token").await.unwrap();

        assert_eq!(card.name, "Currency Agent");
        assert_eq!(card.url, format!("{}/v1beta1/{}/a2a", server.uri(), ENGINE));
    }

    #[tokio::test]
    async fn test_card_lookup_http_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("denied"))
            .mount(&server)
            .await;

        let client = ReasoningEngineClient::new(Client::new()).with_api_root(server.uri());
        let err = client.fetch_agent_card(ENGINE, "t").await.unwrap_err();
        assert!(matches!(err, AgentError::Network(_)));
    }

    #[tokio::test]
    async fn test_list_follows_pages() {
        let server = MockServer::start().await;
        let list_path = "/v1/projects/p1/locations/europe-west1/reasoningEngines";
        Mock::given(method("GET"))
            .and(path(list_path))
            .and(query_param("pageToken", "next"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "reasoningEngines": [{"name": "projects/p1/locations/europe-west1/reasoningEngines/2"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(list_path))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "reasoningEngines": [{"name": "projects/p1/locations/europe-west1/reasoningEngines/1", "displayName": "Support"}],
                "nextPageToken": "next"
            })))
            .mount(&server)
            .await;

        let client = ReasoningEngineClient::new(Client::new()).with_api_root(server.uri());
        let engines = client.list("p1", "europe-west1", "t").await.unwrap();
        let ids: Vec<&str> = engines.iter().map(|e| e.engine_id()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(engines[0].display_name.as_deref(), Some("Support"));
    }

    #[tokio::test]
    async fn test_query_returns_output() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/v1/{}:query", ENGINE)))
            .and(body_json(json!({"input": {"input": "hi"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"output": {"output": "hello"}})))
            .mount(&server)
            .await;

        let client = ReasoningEngineClient::new(Client::new()).with_api_root(server.uri());
        let output = client.query(ENGINE, json!({"input": "hi"}), "t").await.unwrap();
        assert_eq!(output, json!({"output": "hello"}));
    }
}

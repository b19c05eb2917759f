//! Agent card discovery on standard A2A servers

use reqwest::{Client, StatusCode};
use tracing::{debug, info};
use url::Url;

use crate::application::errors::{AgentError, AgentResult};
use crate::infrastructure::a2a::types::AgentCard;

/// Well-known discovery path
pub const AGENT_CARD_PATH: &str = ".well-known/agent-card.json";

/// Discovery path used by older servers
pub const LEGACY_AGENT_CARD_PATH: &str = ".well-known/agent.json";

fn card_url(base: &Url, card_path: &str) -> AgentResult<Url> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(card_path)
        .map_err(|e| AgentError::config(format!("Invalid agent card URL: {}", e)))
}

/// Resolve the card published at `base_url`, authenticating with `token`.
pub async fn fetch_standard_agent_card(
    http: &Client,
    base_url: &str,
    token: &str,
) -> AgentResult<AgentCard> {
    info!("Resolving agent card from: {}", base_url);

    let base = Url::parse(base_url)
        .map_err(|e| AgentError::config(format!("Invalid agent base URL '{}': {}", base_url, e)))?;

    let mut response = get_card(http, card_url(&base, AGENT_CARD_PATH)?, token).await?;
    if response.status() == StatusCode::NOT_FOUND {
        debug!("No card at {}, trying {}", AGENT_CARD_PATH, LEGACY_AGENT_CARD_PATH);
        response = get_card(http, card_url(&base, LEGACY_AGENT_CARD_PATH)?, token).await?;
    }

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AgentError::network(format!(
            "Agent card request failed with status {}: {}",
            status, body
        )));
    }

    let card: AgentCard = response
        .json()
        .await
        .map_err(|e| AgentError::network(format!("Malformed agent card: {}", e)))?;

    info!("Agent card resolved from Standard A2A Server");
    info!("Agent name: {}", card.name);
    info!("Agent URL: {}", card.url);

    Ok(card)
}

async fn get_card(http: &Client, url: Url, token: &str) -> AgentResult<reqwest::Response> {
    debug!("GET {}", url);
    Ok(http.get(url).bearer_auth(token).send().await?)
}

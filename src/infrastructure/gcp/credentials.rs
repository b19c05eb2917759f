//! Cloud credentials resolved from host connections

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use crate::application::errors::{AgentError, AgentResult};
use crate::domain::entities::{AuthType, ConnectionInfo};
use crate::domain::traits::ConnectionStore;

/// Google OAuth2 token endpoint
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Scope requested when a credential declares none
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Lifetime of a signed assertion, in seconds
const ASSERTION_LIFETIME_SECS: i64 = 3600;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Service-account key file contents
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("project_id", &self.project_id)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountKey {
    pub fn from_json(raw: &str) -> AgentResult<Self> {
        serde_json::from_str(raw)
            .map_err(|e| AgentError::config(format!("Invalid service account key: {}", e)))
    }
}

/// Service-account credential; exchanged for a token on refresh
#[derive(Debug, Clone)]
pub struct ServiceAccountCredential {
    key: ServiceAccountKey,
    scopes: Vec<String>,
}

impl ServiceAccountCredential {
    pub fn new(key: ServiceAccountKey) -> Self {
        Self {
            key,
            scopes: Vec::new(),
        }
    }

    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    pub fn key(&self) -> &ServiceAccountKey {
        &self.key
    }

    /// Declared scopes, or the cloud-platform scope when none are declared
    pub fn requested_scopes(&self) -> Vec<String> {
        if self.scopes.is_empty() {
            vec![CLOUD_PLATFORM_SCOPE.to_string()]
        } else {
            self.scopes.clone()
        }
    }

    /// Signed RS256 assertion for the JWT bearer grant
    fn assertion(&self, now: i64) -> AgentResult<String> {
        #[derive(Serialize)]
        struct Claims<'a> {
            iss: &'a str,
            scope: String,
            aud: &'a str,
            iat: i64,
            exp: i64,
        }

        let claims = Claims {
            iss: &self.key.client_email,
            scope: self.requested_scopes().join(" "),
            aud: &self.key.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        let encoding_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .map_err(|e| AgentError::config(format!("Failed to parse private key: {}", e)))?;

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        encode(&header, &claims, &encoding_key)
            .map_err(|e| AgentError::auth(format!("Failed to sign assertion: {}", e)))
    }

    async fn fetch_token(&self, http: &Client) -> AgentResult<String> {
        let assertion = self.assertion(chrono::Utc::now().timestamp())?;

        debug!("Requesting access token from {}", self.key.token_uri);

        let response = http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| AgentError::auth(format!("Token exchange failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::auth(format!(
                "Token exchange failed with status {}: {}",
                status, body
            )));
        }

        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AgentError::auth(format!("Failed to parse token response: {}", e)))?;

        Ok(token.access_token)
    }
}

/// Credential created per request from a connection descriptor
#[derive(Debug, Clone)]
pub enum Credential {
    ServiceAccount(ServiceAccountCredential),
    Bearer(String),
}

impl Credential {
    pub fn auth_type(&self) -> AuthType {
        match self {
            Credential::ServiceAccount(_) => AuthType::Keypair,
            Credential::Bearer(_) => AuthType::OAuth,
        }
    }

    /// Obtain a bearer token. Service accounts hit the token endpoint,
    /// bearer credentials return their token unchanged.
    pub async fn refresh(&self, http: &Client) -> AgentResult<String> {
        match self {
            Credential::ServiceAccount(sa) => sa.fetch_token(http).await,
            Credential::Bearer(token) => Ok(token.clone()),
        }
    }
}

/// Build a credential from a resolved connection descriptor.
///
/// KEYPAIR reads the inline key first, then the key file. OAUTH needs the
/// resolved access token. Other auth types are rejected.
pub fn resolve_credentials(info: &ConnectionInfo) -> AgentResult<Credential> {
    let params = &info.resolved_params;

    match info.auth_type()? {
        AuthType::Keypair => {
            let raw = if let Some(content) = &params.app_secret_content {
                content.clone()
            } else if let Some(path) = &params.key_path {
                std::fs::read_to_string(path).map_err(|e| {
                    AgentError::config(format!("Unable to read key file '{}': {}", path, e))
                })?
            } else {
                return Err(AgentError::config(
                    "No keypair found in connection. \
                     Please refer to DSS Service Account Auth documentation.",
                ));
            };

            let key = ServiceAccountKey::from_json(&raw)?;
            info!("Using service account {}", key.client_email);
            let credential = ServiceAccountCredential::new(key).with_scopes(params.scopes());
            Ok(Credential::ServiceAccount(credential))
        }
        AuthType::OAuth => {
            let token = info.access_token().ok_or_else(|| {
                AgentError::config(
                    "No accessToken found in connection. \
                     Please refer to DSS OAuth2 credentials documentation.",
                )
            })?;
            Ok(Credential::Bearer(token.to_string()))
        }
    }
}

/// Look up a host connection and turn it into a fresh bearer token
pub async fn connection_token(
    connections: &dyn ConnectionStore,
    connection_name: &str,
    http: &Client,
) -> AgentResult<String> {
    let info = connections.get_connection_info(connection_name).await?;
    let credential = resolve_credentials(&info)?;
    credential.refresh(http).await
}

//! Host connection descriptors

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::application::errors::{AgentError, AgentResult};

/// Authentication mode declared by a cloud connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthType {
    /// Service-account key
    Keypair,
    /// Pre-resolved OAuth2 access token
    OAuth,
}

impl AuthType {
    pub fn parse(value: &str) -> AgentResult<Self> {
        match value {
            "KEYPAIR" => Ok(AuthType::Keypair),
            "OAUTH" => Ok(AuthType::OAuth),
            other => Err(AgentError::config(format!(
                "Unsupported authentication type '{}'.",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthType::Keypair => "KEYPAIR",
            AuthType::OAuth => "OAUTH",
        }
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved connection parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionParams {
    pub auth_type: Option<String>,
    /// Inline service-account key JSON
    pub app_secret_content: Option<String>,
    /// Path to a service-account key file
    pub key_path: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl ConnectionParams {
    /// OAuth scopes declared under `scopes`, as a list or a space/comma separated string
    pub fn scopes(&self) -> Vec<String> {
        match self.extra.get("scopes") {
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .filter_map(serde_json::Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            Some(serde_json::Value::String(raw)) => raw
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// OAuth2 credential resolved by the host for the current user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuth2Credential {
    pub access_token: Option<String>,
}

/// Connection descriptor owned by the host. Read-only here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub resolved_params: ConnectionParams,
    #[serde(rename = "resolvedOAuth2Credential", default)]
    pub resolved_oauth2_credential: Option<OAuth2Credential>,
}

impl ConnectionInfo {
    pub fn keypair(name: impl Into<String>, key_json: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resolved_params: ConnectionParams {
                auth_type: Some(AuthType::Keypair.as_str().to_string()),
                app_secret_content: Some(key_json.into()),
                ..Default::default()
            },
            resolved_oauth2_credential: None,
        }
    }

    pub fn oauth(name: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resolved_params: ConnectionParams {
                auth_type: Some(AuthType::OAuth.as_str().to_string()),
                ..Default::default()
            },
            resolved_oauth2_credential: Some(OAuth2Credential {
                access_token: Some(access_token.into()),
            }),
        }
    }

    /// Declared auth type, rejecting anything but KEYPAIR and OAUTH
    pub fn auth_type(&self) -> AgentResult<AuthType> {
        AuthType::parse(self.resolved_params.auth_type.as_deref().unwrap_or(""))
    }

    pub fn access_token(&self) -> Option<&str> {
        self.resolved_oauth2_credential
            .as_ref()
            .and_then(|c| c.access_token.as_deref())
    }
}

//! In-memory connection registry backed by the configuration file

use async_trait::async_trait;
use std::collections::HashMap;

use crate::application::errors::{AgentError, AgentResult};
use crate::domain::entities::ConnectionInfo;
use crate::domain::traits::ConnectionStore;

/// Connections declared under `connections:` in the config
#[derive(Debug, Clone, Default)]
pub struct StaticConnectionStore {
    connections: HashMap<String, ConnectionInfo>,
}

impl StaticConnectionStore {
    pub fn new(connections: HashMap<String, ConnectionInfo>) -> Self {
        Self { connections }
    }

    pub fn with_connection(mut self, name: impl Into<String>, info: ConnectionInfo) -> Self {
        self.connections.insert(name.into(), info);
        self
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.connections.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[async_trait]
impl ConnectionStore for StaticConnectionStore {
    async fn get_connection_info(&self, name: &str) -> AgentResult<ConnectionInfo> {
        let mut info = self
            .connections
            .get(name)
            .cloned()
            .ok_or_else(|| AgentError::config(format!("Connection '{}' not found", name)))?;
        if info.name.is_empty() {
            info.name = name.to_string();
        }
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_fills_name() {
        let mut info = ConnectionInfo::oauth("", "ya29.token");
        info.name.clear();
        let store = StaticConnectionStore::default().with_connection("vertex", info);

        let found = store.get_connection_info("vertex").await.unwrap();
        assert_eq!(found.name, "vertex");
        assert_eq!(store.names(), vec!["vertex"]);
    }

    #[tokio::test]
    async fn test_unknown_connection() {
        let err = StaticConnectionStore::default()
            .get_connection_info("missing")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Connection 'missing' not found");
    }
}

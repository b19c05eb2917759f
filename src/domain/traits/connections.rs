use async_trait::async_trait;

use crate::application::errors::AgentResult;
use crate::domain::entities::ConnectionInfo;

/// Connection registry owned by the host platform
#[async_trait]
pub trait ConnectionStore: Send + Sync {
    /// Look up a connection by name with its parameters resolved
    async fn get_connection_info(&self, name: &str) -> AgentResult<ConnectionInfo>;
}

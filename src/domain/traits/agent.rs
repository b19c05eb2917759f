use async_trait::async_trait;

use crate::domain::entities::{LlmQuery, QueryResponse, Trace};

/// Agent abstraction exposed to the host framework.
///
/// `process` never fails: adapters report pipeline errors as response text.
#[async_trait]
pub trait LlmAgent: Send + Sync {
    /// Adapter name, unique within a `PluginManager`
    fn name(&self) -> &str;

    /// Human-readable description
    fn description(&self) -> &str;

    /// Answer one query
    async fn process(
        &self,
        query: &LlmQuery,
        settings: &serde_json::Value,
        trace: &mut Trace,
    ) -> QueryResponse;
}

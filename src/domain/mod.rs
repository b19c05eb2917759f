//! Domain layer - Host-facing shapes with no transport concerns
//! 
//! This layer contains:
//! - Entities: Query records, responses, connection descriptors
//! - Traits: Abstractions over the host (LlmAgent, ConnectionStore)

pub mod entities;
pub mod traits;

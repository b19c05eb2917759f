//! Application layer
//! 
//! This layer contains:
//! - Errors: Error kinds shared by every adapter

pub mod errors;

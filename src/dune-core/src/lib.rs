//! Dune Core Library
//!
//! Shared types for the Dune API client:
//! - Client and transport configuration
//! - Typed views over execution responses

pub mod config;
pub mod models;

// Re-export commonly used types
pub use config::{Config, ConfigError, TransportConfig, API_KEY_HEADER, BASE_URL};
pub use models::*;

//! External Services
//!
//! This module contains services that interact with external systems:
//! - api: API request queue service
//! - location: Device position lookup

pub mod api;
pub mod location;

// Re-export commonly used types for convenience
pub use api::{ApiRequest, ApiResponse, Priority};

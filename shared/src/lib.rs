//! Shared types for the FoodPOS server
//!
//! Data models and utilities used by the server and (via the JSON API)
//! the front-of-house clients.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

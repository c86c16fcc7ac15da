//! Data models
//!
//! Shared between pos-server and frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64`; timestamps are Unix millis.

pub mod category;
pub mod order;
pub mod product;
pub mod profile;
pub mod shift;
pub mod stock;

// Re-exports
pub use category::*;
pub use order::*;
pub use product::*;
pub use profile::*;
pub use shift::*;
pub use stock::*;

//! API route modules
//!
//! # Structure
//!
//! - [`health`] - liveness check
//! - [`auth`] - sign-up, login, current user
//! - [`categories`] - menu category management
//! - [`products`] - product catalog management
//! - [`stock`] - inventory management
//! - [`orders`] - order lifecycle and payment
//! - [`shifts`] - cash-register shift sessions

pub mod auth;
pub mod categories;
pub mod health;
pub mod orders;
pub mod products;
pub mod shifts;
pub mod stock;

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::core::ServerState;

/// Assemble the full application router.
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(categories::router())
        .merge(products::router())
        .merge(stock::router())
        .merge(orders::router())
        .merge(shifts::router())
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

//! Stock API module

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/stock", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/low", get(handler::low))
        .route("/value", get(handler::total_value))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .route("/{id}/adjust", post(handler::adjust))
}

//! Internal RPC surface of the authentication service.

mod handlers;

use axum::{Router, routing::post};

use identity::rpc::wire;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(wire::VALIDATE_USER, post(handlers::validate_user))
        .route(wire::CREATE_TOKEN, post(handlers::create_token))
}

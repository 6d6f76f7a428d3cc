/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /auth は公開、/session は LocalVerifier を直接使う auth guard の内側
 */
use axum::{
    Router,
    routing::{get, post},
};

use identity::middleware::{self, Access};

use crate::api::v1::handlers::{login::login, session::session};
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    let public = Router::new().route("/auth", post(login));

    let user = middleware::auth::apply(
        Router::new().route("/session", get(session)),
        state.verifier.clone(),
        &state.credential_name,
        Access::User,
    );

    public.merge(user)
}

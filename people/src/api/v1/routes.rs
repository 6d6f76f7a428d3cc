/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - route group ごとに必要な認証レベル (User / Profile) を route_layer で適用
 */
use axum::{Router, routing::get, routing::put};

use identity::middleware::{self, Access};

use crate::api::v1::handlers::{
    profiles::{assign_co_manager, list_profiles, profile_info, remove_co_manager},
    user::current_user,
};
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    let user = Router::new()
        .route("/user", get(current_user))
        .route("/profiles", get(list_profiles))
        .route(
            "/profile/{profile_id}/co-manager",
            put(assign_co_manager).delete(remove_co_manager),
        );
    let user = middleware::auth::apply(
        user,
        state.verifier.clone(),
        &state.credential_name,
        Access::User,
    );

    let profile = Router::new().route("/profile/info", get(profile_info));
    let profile = middleware::auth::apply(
        profile,
        state.verifier.clone(),
        &state.credential_name,
        Access::Profile,
    );

    user.merge(profile)
}

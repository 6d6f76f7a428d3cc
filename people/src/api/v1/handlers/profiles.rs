/*
 * Responsibility
 * - profile 系 handler (一覧 / 選択中 profile / co-manager の付け替え)
 * - co-manager の変更は ProfileAuthorizationCheck を通した上で owner のみ
 */
use anyhow::Context;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use tracing::info;

use identity::{AuthContext, Envelope, HandlerError};

use crate::api::v1::dto::profiles::{AssignCoManagerRequest, ProfileResponse};
use crate::repos::ProfileRow;
use crate::services::AccessError;
use crate::state::AppState;

pub const NOT_OWNER: &str = "only the profile owner can change its co-manager";

/// GET /api/v1/profiles: owned and co-managed profiles.
pub async fn list_profiles(
    State(state): State<AppState>,
    ctx: AuthContext,
) -> Result<Json<Envelope<Vec<ProfileResponse>>>, HandlerError> {
    let subject = ctx.require_subject()?;

    let rows = state
        .profiles
        .list_for_account(subject.id)
        .await
        .context("list profiles")?;

    Ok(Json(Envelope::ok(
        rows.into_iter().map(ProfileResponse::from).collect(),
        "Profiles fetched.",
    )))
}

/// GET /api/v1/profile/info: the profile selected for this request.
pub async fn profile_info(
    State(state): State<AppState>,
    ctx: AuthContext,
) -> Result<Json<Envelope<ProfileResponse>>, HandlerError> {
    let profile_id = ctx.require_profile()?;

    let row = state
        .profiles
        .get(profile_id)
        .await
        .context("load profile")?
        .ok_or_else(|| HandlerError::user(StatusCode::NOT_FOUND, "profile not found"))?;

    Ok(Json(Envelope::ok(row.into(), "Profile fetched.")))
}

/// PUT /api/v1/profile/{profile_id}/co-manager
pub async fn assign_co_manager(
    State(state): State<AppState>,
    ctx: AuthContext,
    WithRejection(Path(profile_id), _): WithRejection<Path<i64>, HandlerError>,
    WithRejection(Json(req), _): WithRejection<Json<AssignCoManagerRequest>, HandlerError>,
) -> Result<Json<Envelope<ProfileResponse>>, HandlerError> {
    let manager_id = req.validate().map_err(HandlerError::validation)?;
    let owner = owned_profile(&state, &ctx, profile_id).await?;

    if manager_id == owner.account_id {
        return Err(HandlerError::validation("cannot assign yourself as co-manager"));
    }

    let manager = state
        .accounts
        .find_by_id(manager_id)
        .await
        .context("load co-manager account")?;
    if !manager.is_some_and(|m| m.is_active) {
        return Err(HandlerError::validation("co-manager account not found"));
    }

    let row = update_manager(&state, profile_id, Some(manager_id)).await?;
    info!(profile_id, manager_id, "co-manager assigned");

    Ok(Json(Envelope::ok(row.into(), "Co-manager assigned.")))
}

/// DELETE /api/v1/profile/{profile_id}/co-manager
pub async fn remove_co_manager(
    State(state): State<AppState>,
    ctx: AuthContext,
    WithRejection(Path(profile_id), _): WithRejection<Path<i64>, HandlerError>,
) -> Result<Json<Envelope<ProfileResponse>>, HandlerError> {
    owned_profile(&state, &ctx, profile_id).await?;

    let row = update_manager(&state, profile_id, None).await?;
    info!(profile_id, "co-manager removed");

    Ok(Json(Envelope::ok(row.into(), "Co-manager removed.")))
}

/// Profile the caller may act on *and* owns. A co-manager cannot re-delegate.
async fn owned_profile(
    state: &AppState,
    ctx: &AuthContext,
    profile_id: i64,
) -> Result<ProfileRow, HandlerError> {
    let subject = ctx.require_subject()?;

    match state.profile_access.check(profile_id, subject.id).await {
        Ok(()) => {}
        Err(AccessError::NotAuthorized) => {
            return Err(HandlerError::forbidden(AccessError::NotAuthorized.to_string()));
        }
        Err(AccessError::Repo(e)) => return Err(anyhow::Error::from(e).into()),
    }

    let row = state
        .profiles
        .get(profile_id)
        .await
        .context("load profile")?
        .ok_or_else(|| HandlerError::user(StatusCode::NOT_FOUND, "profile not found"))?;

    if row.account_id != subject.id {
        return Err(HandlerError::forbidden(NOT_OWNER));
    }

    Ok(row)
}

async fn update_manager(
    state: &AppState,
    profile_id: i64,
    manager_id: Option<i64>,
) -> Result<ProfileRow, HandlerError> {
    state
        .profiles
        .set_manager(profile_id, manager_id)
        .await
        .context("update co-manager")?
        .ok_or_else(|| HandlerError::user(StatusCode::NOT_FOUND, "profile not found"))
}

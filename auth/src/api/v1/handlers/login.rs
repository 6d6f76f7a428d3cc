/*
 * Responsibility
 * - POST /api/v1/auth (login)
 * - directory で password を確認 → token 発行 → cookie + envelope で返す
 */
use anyhow::Context;
use axum::{Json, extract::State};
use axum_extra::extract::{
    WithRejection,
    cookie::{Cookie, CookieJar, SameSite},
};
use tracing::{info, warn};

use identity::{Envelope, HandlerError};

use crate::api::v1::dto::login::{LoginRequest, LoginResponse};
use crate::state::AppState;

pub const BAD_CREDENTIALS: &str = "invalid email or password";

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(req), _): WithRejection<Json<LoginRequest>, HandlerError>,
) -> Result<(CookieJar, Json<Envelope<LoginResponse>>), HandlerError> {
    req.validate().map_err(HandlerError::validation)?;

    let account = state
        .directory
        .authenticate(req.email.trim(), &req.password)
        .await
        .context("account directory")?
        .ok_or_else(|| {
            warn!("login rejected");
            HandlerError::unauthorized(BAD_CREDENTIALS)
        })?;

    let ttl_hours = state.issuer.default_ttl_hours();
    let issued = state
        .issuer
        .issue(account.id, Some(ttl_hours))
        .context("issue session token")?;

    info!(account_id = account.id, "login succeeded");

    let cookie = Cookie::build((state.credential_name.to_string(), issued.token.clone()))
        .http_only(true)
        .secure(state.secure_cookie)
        .same_site(SameSite::Lax)
        .path("/".to_string())
        .max_age(time::Duration::hours(i64::from(ttl_hours)))
        .build();

    Ok((
        jar.add(cookie),
        Json(Envelope::ok(
            LoginResponse {
                token: issued.token,
                expires_at: issued.expires_at,
                account,
            },
            "Login successful.",
        )),
    ))
}

//! credential 抽出 → TokenVerifier → Identity を extensions に入れる
//!
//! - credential: 設定名の header → 同名 cookie
//! - profile selector: `Profile` header → `Profile` cookie (profile-scoped routes のみ)
//! - credential 起因の失敗は 401、それ以外の verifier 失敗は 403 (text/plain)

use std::sync::Arc;

use axum::{
    Router,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, warn};

use crate::context::{Identity, Subject};
use crate::verifier::{TokenVerifier, VerificationRequest};

pub const PROFILE_SELECTOR: &str = "Profile";

pub const MISSING_TOKEN: &str = "Token is not present";
pub const MISSING_PROFILE: &str = "Profile is not present";
pub const ACCESS_DENIED: &str = "Access denied";

/// What a route group requires before its handlers run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Valid credential.
    User,
    /// Valid credential plus a profile owned by or delegated to the subject.
    Profile,
}

#[derive(Clone)]
pub struct AuthGuard {
    verifier: Arc<dyn TokenVerifier>,
    credential_name: Arc<str>,
    access: Access,
}

impl AuthGuard {
    pub fn new(verifier: Arc<dyn TokenVerifier>, credential_name: &str, access: Access) -> Self {
        Self {
            verifier,
            credential_name: Arc::from(credential_name),
            access,
        }
    }
}

/// Protect every route of `router` (applied with `route_layer`, so unmatched paths still 404).
///
/// ```ignore
/// let profile_routes = middleware::auth::apply(profile_routes, verifier.clone(), &http.credential_name, Access::Profile);
/// ```
pub fn apply<S>(
    router: Router<S>,
    verifier: Arc<dyn TokenVerifier>,
    credential_name: &str,
    access: Access,
) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let guard = AuthGuard::new(verifier, credential_name, access);
    router.route_layer(middleware::from_fn_with_state(guard, guard_request))
}

pub async fn guard_request(State(guard): State<AuthGuard>, mut req: Request, next: Next) -> Response {
    let Some(token) = credential(req.headers(), &guard.credential_name) else {
        warn!("{MISSING_TOKEN}");
        return reject(StatusCode::UNAUTHORIZED, MISSING_TOKEN);
    };

    let mut verification = VerificationRequest::new(token);

    if guard.access == Access::Profile {
        let Some(selector) = credential(req.headers(), PROFILE_SELECTOR) else {
            warn!("{MISSING_PROFILE}");
            return reject(StatusCode::UNAUTHORIZED, MISSING_PROFILE);
        };
        verification = verification.with_profile(parse_profile(&selector));
    }

    let verified = match guard.verifier.validate_user(verification).await {
        Ok(v) => v,
        Err(err) if err.is_credential_problem() => {
            warn!(error = %err, code = err.code(), "credential rejected");
            return reject(StatusCode::UNAUTHORIZED, &err.to_string());
        }
        Err(err) => {
            warn!(error = %err, code = err.code(), "authorization failed");
            return reject(StatusCode::FORBIDDEN, ACCESS_DENIED);
        }
    };

    let subject: Subject = match serde_json::from_value(verified.data) {
        Ok(s) => s,
        Err(err) => {
            warn!(error = %err, "verified subject record could not be decoded");
            return reject(StatusCode::FORBIDDEN, ACCESS_DENIED);
        }
    };

    let profile = match guard.access {
        Access::Profile => Some(verified.profile_id),
        Access::User => None,
    };

    debug!(subject_id = subject.id, ?profile, "request authenticated");

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(Identity { subject, profile });

    next.run(req).await
}

fn reject(status: StatusCode, message: &str) -> Response {
    (status, message.to_string()).into_response()
}

/// Header value first, then the cookie of the same name. Blank values count as absent.
pub fn credential(headers: &HeaderMap, name: &str) -> Option<String> {
    let from_header = headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim())
        .filter(|v| !v.is_empty());

    if let Some(v) = from_header {
        return Some(v.to_string());
    }

    CookieJar::from_headers(headers)
        .get(name)
        .map(|c| c.value().trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Non-numeric selectors become `0`, which the verifier reports as a missing profile.
pub fn parse_profile(selector: &str) -> i64 {
    selector.trim().parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert("session-token", HeaderValue::from_static("from-header"));
        headers.insert("cookie", HeaderValue::from_static("session-token=from-cookie"));
        assert_eq!(credential(&headers, "session-token").as_deref(), Some("from-header"));
    }

    #[test]
    fn cookie_is_the_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("cookie", HeaderValue::from_static("a=1; Profile=7"));
        assert_eq!(credential(&headers, "Profile").as_deref(), Some("7"));
    }

    #[test]
    fn blank_values_are_absent() {
        let mut headers = HeaderMap::new();
        headers.insert("session-token", HeaderValue::from_static("   "));
        headers.insert("cookie", HeaderValue::from_static("session-token="));
        assert_eq!(credential(&headers, "session-token"), None);
    }

    #[test]
    fn header_value_is_taken_verbatim() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(
            credential(&headers, "Authorization").as_deref(),
            Some("Bearer abc.def.ghi")
        );
    }

    #[test]
    fn selector_parsing() {
        assert_eq!(parse_profile(" 7 "), 7);
        assert_eq!(parse_profile("seven"), 0);
    }
}

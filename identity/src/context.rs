/*
 * Responsibility
 * - Handler から見える「リクエスト単位のコンテキスト」(AuthContext)
 * - middleware が RequestMeta / Identity を extensions に積み、extractor がここで組み立てる
 *
 * Notes
 * - Credential の検証は middleware/verifier 側の責務
 * - AuthContext は 1 リクエストで 1 度だけ組み立てられ、以後は不変
 */
use std::collections::HashMap;
use std::convert::Infallible;

use axum::extract::{FromRequestParts, RawPathParams};
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};

use crate::error::HandlerError;

/// Public account record of an authenticated subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: i64,
    pub user_name: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub account_type: i32,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

/// Per-request facts known before authentication.
#[derive(Debug, Clone)]
pub struct RequestMeta {
    pub remote_address: String,
    pub request_id: String,
    pub span: tracing::Span,
}

/// Outcome of a successful verification, placed in extensions by the auth guard.
#[derive(Debug, Clone)]
pub struct Identity {
    pub subject: Subject,
    pub profile: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct AuthContext {
    pub remote_address: String,
    pub request_id: String,
    /// Request span, carries `request_id`.
    pub span: tracing::Span,
    pub subject: Option<Subject>,
    /// Authorized profile. `None` unless the route is profile-scoped.
    pub profile: Option<i64>,
    pub vars: HashMap<String, String>,
}

impl AuthContext {
    pub fn subject_id(&self) -> Option<i64> {
        self.subject.as_ref().map(|s| s.id)
    }

    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Subject of a route behind the auth guard.
    pub fn require_subject(&self) -> Result<&Subject, HandlerError> {
        self.subject
            .as_ref()
            .ok_or_else(|| HandlerError::unauthorized("unauthenticated request"))
    }

    pub fn require_profile(&self) -> Result<i64, HandlerError> {
        self.profile
            .ok_or_else(|| HandlerError::unauthorized("Profile is not present"))
    }
}

impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let meta = parts.extensions.get::<RequestMeta>().cloned();
        let identity = parts.extensions.get::<Identity>().cloned();

        let vars = match RawPathParams::from_request_parts(parts, state).await {
            Ok(params) => params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            Err(_) => HashMap::new(),
        };

        let (remote_address, request_id, span) = match meta {
            Some(m) => (m.remote_address, m.request_id, m.span),
            None => (String::new(), String::new(), tracing::Span::current()),
        };
        let (subject, profile) = match identity {
            Some(i) => (Some(i.subject), i.profile),
            None => (None, None),
        };

        Ok(Self {
            remote_address,
            request_id,
            span,
            subject,
            profile,
            vars,
        })
    }
}

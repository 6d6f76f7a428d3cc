/*
 * Responsibility
 * - Internal RPC の payload 定義 (JSON over HTTP POST)
 * - 失敗時は non-2xx + RpcFault { code, message }
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::verifier::VerifyError;

pub const VALIDATE_USER: &str = "/rpc/v1/validate-user";
pub const CREATE_TOKEN: &str = "/rpc/v1/create-token";
pub const ACCOUNT_DETAILS: &str = "/rpc/v1/account-details";
pub const VALIDATE_PROFILE: &str = "/rpc/v1/validate-profile";
pub const AUTHENTICATE: &str = "/rpc/v1/authenticate";

pub const STATUS_OK: i32 = 1;
pub const STATUS_FAILED: i32 = 0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTokenRequest {
    pub account_id: i64,
    /// Falls back to the issuer's configured lifetime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_hours: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTokenReply {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub status: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDetailsRequest {
    pub account_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateProfileRequest {
    pub profile_id: i64,
    pub account_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticateRequest {
    pub email: String,
    pub password: String,
}

/// Reply carrying an opaque record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenericReply {
    #[serde(default)]
    pub data: serde_json::Value,
    pub status: i32,
    #[serde(default)]
    pub message: String,
}

impl GenericReply {
    pub fn ok(data: serde_json::Value, message: impl Into<String>) -> Self {
        Self {
            data,
            status: STATUS_OK,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            data: serde_json::Value::Null,
            status: STATUS_FAILED,
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Failure body of every RPC endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcFault {
    pub code: String,
    pub message: String,
    #[serde(skip)]
    status: Option<u16>,
}

impl RpcFault {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", message)
    }
}

impl From<VerifyError> for RpcFault {
    fn from(e: VerifyError) -> Self {
        let status = match &e {
            e if e.is_credential_problem() => StatusCode::UNAUTHORIZED,
            VerifyError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::FORBIDDEN,
        };
        Self::new(status, e.code(), e.to_string())
    }
}

impl IntoResponse for RpcFault {
    fn into_response(self) -> Response {
        let status = self
            .status
            .and_then(|s| StatusCode::from_u16(s).ok())
            .unwrap_or(StatusCode::BAD_REQUEST);
        (status, Json(self)).into_response()
    }
}

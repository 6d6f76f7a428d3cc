/*
 * Responsibility
 * - auth service から呼ばれる account directory の RPC handler
 * - account-details / validate-profile / authenticate
 */
use axum::{Json, extract::State, http::StatusCode};
use serde_json::Value;
use tracing::{error, info};

use identity::VerifyError;
use identity::rpc::wire::{AccountDetailsRequest, AuthenticateRequest, ValidateProfileRequest};
use identity::rpc::{GenericReply, RpcFault};

use crate::services::credentials::{self, CredentialError};
use crate::services::AccessError;
use crate::state::AppState;

fn internal(e: impl std::fmt::Display) -> RpcFault {
    error!(error = %e, "directory lookup failed");
    RpcFault::internal("directory lookup failed")
}

fn subject_value(subject: &identity::Subject) -> Result<Value, RpcFault> {
    serde_json::to_value(subject).map_err(internal)
}

pub async fn account_details(
    State(state): State<AppState>,
    Json(req): Json<AccountDetailsRequest>,
) -> Result<Json<GenericReply>, RpcFault> {
    let account = state
        .accounts
        .find_by_id(req.account_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| {
            let e = VerifyError::UnknownAccount;
            RpcFault::new(StatusCode::NOT_FOUND, e.code(), e.to_string())
        })?;

    if !account.is_active {
        return Ok(Json(GenericReply::failed("account is inactive")));
    }

    let data = subject_value(&account.to_subject())?;
    Ok(Json(GenericReply::ok(data, "Account found.")))
}

pub async fn validate_profile(
    State(state): State<AppState>,
    Json(req): Json<ValidateProfileRequest>,
) -> Result<Json<GenericReply>, RpcFault> {
    match state
        .profile_access
        .check(req.profile_id, req.account_id)
        .await
    {
        Ok(()) => Ok(Json(GenericReply::ok(Value::Null, "profile is valid"))),
        Err(AccessError::NotAuthorized) => Ok(Json(GenericReply::failed("profile is invalid"))),
        Err(AccessError::Repo(e)) => Err(internal(e)),
    }
}

pub async fn authenticate(
    State(state): State<AppState>,
    Json(req): Json<AuthenticateRequest>,
) -> Result<Json<GenericReply>, RpcFault> {
    let account = credentials::authenticate(state.accounts.as_ref(), &req.email, &req.password)
        .await
        .map_err(|e| match e {
            CredentialError::Repo(e) => internal(e),
            CredentialError::Hash(e) => internal(e),
        })?;

    let Some(account) = account else {
        return Ok(Json(GenericReply::failed("invalid email or password")));
    };

    info!(account_id = account.id, "credentials accepted");
    let data = subject_value(&account.to_subject())?;
    Ok(Json(GenericReply::ok(data, "Authenticated.")))
}

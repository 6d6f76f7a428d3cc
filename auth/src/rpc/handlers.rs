/*
 * Responsibility
 * - validate-user / create-token の RPC handler
 * - 失敗は RpcFault (non-2xx + {code, message}) に変換し、client 側で VerifyError に戻す
 */
use axum::{Json, extract::State};
use tracing::{info, warn};

use identity::rpc::RpcFault;
use identity::rpc::wire::{CreateTokenReply, CreateTokenRequest, STATUS_OK};
use identity::{Verification, VerificationRequest};

use crate::services::token::TokenError;
use crate::state::AppState;

pub async fn validate_user(
    State(state): State<AppState>,
    Json(req): Json<VerificationRequest>,
) -> Result<Json<Verification>, RpcFault> {
    let verification = state.verifier.validate_user(req).await.map_err(|e| {
        warn!(error = %e, code = e.code(), "validate-user rejected");
        RpcFault::from(e)
    })?;

    Ok(Json(verification))
}

pub async fn create_token(
    State(state): State<AppState>,
    Json(req): Json<CreateTokenRequest>,
) -> Result<Json<CreateTokenReply>, RpcFault> {
    let issued = state
        .issuer
        .issue(req.account_id, req.ttl_hours)
        .map_err(|e| match e {
            TokenError::Signing(_) => RpcFault::internal(e.to_string()),
            TokenError::InvalidSubject | TokenError::InvalidTtl => RpcFault::bad_request(e.to_string()),
        })?;

    info!(account_id = req.account_id, expires_at = %issued.expires_at, "token issued");

    Ok(Json(CreateTokenReply {
        token: issued.token,
        expires_at: issued.expires_at,
        status: STATUS_OK,
    }))
}

/*
 * Responsibility
 * - people service が持つ account / profile 情報への問い合わせ口 (AccountDirectory)
 * - RPC 実装 (PeopleClient): 失敗の意味付けは DirectoryError に閉じる
 */
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use identity::rpc::wire::{self, AccountDetailsRequest, AuthenticateRequest, ValidateProfileRequest};
use identity::rpc::{GenericReply, RpcClient, RpcError};
use identity::{Subject, VerifyError};

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("account directory unavailable: {0}")]
    Unavailable(String),

    #[error("malformed account record: {0}")]
    Malformed(String),
}

impl From<RpcError> for DirectoryError {
    fn from(e: RpcError) -> Self {
        DirectoryError::Unavailable(e.to_string())
    }
}

impl From<DirectoryError> for VerifyError {
    fn from(e: DirectoryError) -> Self {
        VerifyError::Unavailable(e.to_string())
    }
}

#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Public record of an active account. `None` when absent or inactive.
    async fn account_details(&self, account_id: i64) -> Result<Option<Value>, DirectoryError>;

    /// Whether `account_id` owns or co-manages `profile_id`.
    async fn validate_profile(&self, profile_id: i64, account_id: i64) -> Result<bool, DirectoryError>;

    /// Password check. `None` on bad credentials or an inactive account.
    async fn authenticate(&self, email: &str, password: &str) -> Result<Option<Subject>, DirectoryError>;
}

/// [`AccountDirectory`] served by the people service over the internal RPC channel.
#[derive(Clone, Debug)]
pub struct PeopleClient {
    rpc: RpcClient,
}

impl PeopleClient {
    pub fn new(rpc: RpcClient) -> Self {
        Self { rpc }
    }
}

#[async_trait]
impl AccountDirectory for PeopleClient {
    async fn account_details(&self, account_id: i64) -> Result<Option<Value>, DirectoryError> {
        let reply = self
            .rpc
            .call::<_, GenericReply>(wire::ACCOUNT_DETAILS, &AccountDetailsRequest { account_id })
            .await;

        match reply {
            Ok(r) if r.is_ok() => Ok(Some(r.data)),
            Ok(_) => Ok(None),
            Err(RpcError::Fault { code, .. }) if code == VerifyError::UnknownAccount.code() => {
                Ok(None)
            }
            Err(e) => {
                warn!(account_id, error = %e, "account-details call failed");
                Err(e.into())
            }
        }
    }

    async fn validate_profile(&self, profile_id: i64, account_id: i64) -> Result<bool, DirectoryError> {
        let reply: GenericReply = self
            .rpc
            .call(
                wire::VALIDATE_PROFILE,
                &ValidateProfileRequest {
                    profile_id,
                    account_id,
                },
            )
            .await
            .inspect_err(|e| warn!(profile_id, account_id, error = %e, "validate-profile call failed"))?;

        Ok(reply.is_ok())
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<Option<Subject>, DirectoryError> {
        let reply: GenericReply = self
            .rpc
            .call(
                wire::AUTHENTICATE,
                &AuthenticateRequest {
                    email: email.to_string(),
                    password: password.to_string(),
                },
            )
            .await?;

        if !reply.is_ok() {
            return Ok(None);
        }

        serde_json::from_value(reply.data)
            .map(Some)
            .map_err(|e| DirectoryError::Malformed(e.to_string()))
    }
}

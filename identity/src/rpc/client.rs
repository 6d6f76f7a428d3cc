use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::warn;

use crate::rpc::wire::{self, CreateTokenReply, CreateTokenRequest, RpcFault};
use crate::verifier::{STATUS_VERIFIED, TokenVerifier, Verification, VerificationRequest, VerifyError};

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("rpc transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("rpc fault {status} {code}: {message}")]
    Fault {
        status: u16,
        code: String,
        message: String,
    },
}

/// JSON-over-HTTP client for one peer service.
///
/// No retry and no explicit timeout: a failed call surfaces immediately.
#[derive(Clone, Debug)]
pub struct RpcClient {
    http: reqwest::Client,
    base_url: String,
}

impl RpcClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn call<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, RpcError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.http.post(&url).json(body).send().await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json::<Resp>().await?);
        }

        // Peers answer failures with an RpcFault body; anything else is a broken peer.
        let fault = match resp.json::<RpcFault>().await {
            Ok(f) => f,
            Err(_) => RpcFault::new(status, "UNAVAILABLE", status.to_string()),
        };
        Err(RpcError::Fault {
            status: status.as_u16(),
            code: fault.code,
            message: fault.message,
        })
    }
}

/// [`TokenVerifier`] backed by the authentication service's `validate-user` RPC.
#[derive(Clone, Debug)]
pub struct RemoteVerifier {
    client: RpcClient,
}

impl RemoteVerifier {
    pub fn new(client: RpcClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TokenVerifier for RemoteVerifier {
    async fn validate_user(&self, req: VerificationRequest) -> Result<Verification, VerifyError> {
        let reply: Verification = self
            .client
            .call(wire::VALIDATE_USER, &req)
            .await
            .map_err(|e| match e {
                RpcError::Fault { code, message, .. } => VerifyError::from_code(&code, &message),
                RpcError::Transport(err) => {
                    warn!(error = %err, "validate-user call failed");
                    VerifyError::Unavailable(err.to_string())
                }
            })?;

        if reply.status != STATUS_VERIFIED {
            return Err(VerifyError::InvalidSignature);
        }

        Ok(reply)
    }
}

/// Client for the authentication service's `create-token` RPC.
#[derive(Clone, Debug)]
pub struct TokenClient {
    client: RpcClient,
}

impl TokenClient {
    pub fn new(client: RpcClient) -> Self {
        Self { client }
    }

    pub async fn create_token(
        &self,
        account_id: i64,
        ttl_hours: Option<u32>,
    ) -> Result<(String, DateTime<Utc>), RpcError> {
        let reply: CreateTokenReply = self
            .client
            .call(
                wire::CREATE_TOKEN,
                &CreateTokenRequest {
                    account_id,
                    ttl_hours,
                },
            )
            .await?;
        Ok((reply.token, reply.expires_at))
    }
}

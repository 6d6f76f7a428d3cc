//! Token verification contract shared by every service.
//!
//! The authentication service owns the signing key and provides the real
//! implementation. Every other service reaches it through
//! [`crate::rpc::RemoteVerifier`]. The middleware only sees this trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Status flag carried by a successful verification.
pub const STATUS_VERIFIED: i32 = 1;

/// Input of a single verification. Built fresh for every inbound request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    pub token: String,
    /// `0` means "no profile selected".
    #[serde(default)]
    pub profile_id: i64,
    #[serde(default)]
    pub is_profile_validate: bool,
}

impl VerificationRequest {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            profile_id: 0,
            is_profile_validate: false,
        }
    }

    pub fn with_profile(mut self, profile_id: i64) -> Self {
        self.profile_id = profile_id;
        self.is_profile_validate = true;
        self
    }

    /// Input checks that come before any decoding.
    pub fn precheck(&self) -> Result<(), VerifyError> {
        if self.token.trim().is_empty() {
            return Err(VerifyError::MissingCredential);
        }
        if self.is_profile_validate && self.profile_id <= 0 {
            return Err(VerifyError::MissingProfile);
        }
        Ok(())
    }
}

/// Result of a successful verification.
///
/// `data` is the subject's public record as produced by the account directory.
/// The verifier never looks inside it; the caller deserializes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    pub data: serde_json::Value,
    /// Authorized profile, or `0` when no profile check was requested.
    #[serde(default)]
    pub profile_id: i64,
    pub status: i32,
    pub message: String,
}

impl Verification {
    pub fn verified(data: serde_json::Value, profile_id: i64) -> Self {
        Self {
            data,
            profile_id,
            status: STATUS_VERIFIED,
            message: "User verified.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("token is not present")]
    MissingCredential,
    #[error("invalid jwt token")]
    InvalidSignature,
    #[error("invalid jwt claims")]
    InvalidClaims,
    #[error("token has expired")]
    Expired,
    #[error("invalid account")]
    UnknownAccount,
    #[error("profile is not present")]
    MissingProfile,
    #[error("profile is invalid")]
    ProfileNotAuthorized,
    #[error("verification unavailable: {0}")]
    Unavailable(String),
}

impl VerifyError {
    /// Failures caused by the credential (or the selector sent along with it).
    /// The middleware answers these with 401, everything else with 403.
    pub fn is_credential_problem(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential
                | Self::MissingProfile
                | Self::InvalidSignature
                | Self::InvalidClaims
                | Self::Expired
        )
    }

    /// Stable wire code used on the internal RPC channel.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingCredential => "MISSING_CREDENTIAL",
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::InvalidClaims => "INVALID_CLAIMS",
            Self::Expired => "EXPIRED",
            Self::UnknownAccount => "UNKNOWN_ACCOUNT",
            Self::MissingProfile => "MISSING_PROFILE",
            Self::ProfileNotAuthorized => "PROFILE_NOT_AUTHORIZED",
            Self::Unavailable(_) => "UNAVAILABLE",
        }
    }

    /// Inverse of [`VerifyError::code`]. Unknown codes collapse into `Unavailable`.
    pub fn from_code(code: &str, message: &str) -> Self {
        match code {
            "MISSING_CREDENTIAL" => Self::MissingCredential,
            "INVALID_SIGNATURE" => Self::InvalidSignature,
            "INVALID_CLAIMS" => Self::InvalidClaims,
            "EXPIRED" => Self::Expired,
            "UNKNOWN_ACCOUNT" => Self::UnknownAccount,
            "MISSING_PROFILE" => Self::MissingProfile,
            "PROFILE_NOT_AUTHORIZED" => Self::ProfileNotAuthorized,
            _ => Self::Unavailable(message.to_string()),
        }
    }
}

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn validate_user(&self, req: VerificationRequest) -> Result<Verification, VerifyError>;
}

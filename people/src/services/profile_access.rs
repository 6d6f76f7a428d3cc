use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::repos::{ProfileStore, RepoError};

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("profile is invalid")]
    NotAuthorized,

    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Confirms a subject owns, or co-manages, a profile.
///
/// Consulted on behalf of the verifier (validate-profile RPC) and by the
/// delegation handlers before they touch a profile.
#[derive(Clone)]
pub struct ProfileAuthorizationCheck {
    profiles: Arc<dyn ProfileStore>,
}

impl ProfileAuthorizationCheck {
    pub fn new(profiles: Arc<dyn ProfileStore>) -> Self {
        Self { profiles }
    }

    pub async fn check(&self, profile_id: i64, subject_id: i64) -> Result<(), AccessError> {
        if self.profiles.is_accessible(profile_id, subject_id).await? {
            Ok(())
        } else {
            debug!(profile_id, subject_id, "profile not accessible");
            Err(AccessError::NotAuthorized)
        }
    }
}

/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use identity::TokenVerifier;

use crate::repos::{AccountStore, ProfileStore};
use crate::services::ProfileAuthorizationCheck;

#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountStore>,
    pub profiles: Arc<dyn ProfileStore>,
    pub profile_access: ProfileAuthorizationCheck,
    /// Remote verifier in production: the signing key lives in the auth service.
    pub verifier: Arc<dyn TokenVerifier>,
    pub credential_name: Arc<str>,
}

impl AppState {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        profiles: Arc<dyn ProfileStore>,
        verifier: Arc<dyn TokenVerifier>,
        credential_name: &str,
    ) -> Self {
        Self {
            accounts,
            profile_access: ProfileAuthorizationCheck::new(profiles.clone()),
            profiles,
            verifier,
            credential_name: Arc::from(credential_name),
        }
    }
}

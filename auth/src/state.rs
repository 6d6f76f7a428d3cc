use std::sync::Arc;

use identity::TokenVerifier;

use crate::clients::AccountDirectory;
use crate::services::token::TokenIssuer;

#[derive(Clone)]
pub struct AppState {
    pub issuer: Arc<TokenIssuer>,
    /// Local verifier; the RPC server and the session route both use it.
    pub verifier: Arc<dyn TokenVerifier>,
    pub directory: Arc<dyn AccountDirectory>,
    pub credential_name: Arc<str>,
    pub secure_cookie: bool,
}

impl AppState {
    pub fn new(
        issuer: Arc<TokenIssuer>,
        verifier: Arc<dyn TokenVerifier>,
        directory: Arc<dyn AccountDirectory>,
        credential_name: &str,
        secure_cookie: bool,
    ) -> Self {
        Self {
            issuer,
            verifier,
            directory,
            credential_name: Arc::from(credential_name),
            secure_cookie,
        }
    }
}

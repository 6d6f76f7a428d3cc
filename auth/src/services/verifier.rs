//! The verifier every service ends up calling.
//!
//! Decode the credential, resolve the subject through the account directory,
//! then (when asked) confirm the subject may act on the selected profile.
//! Nothing is cached: each call re-verifies from scratch.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use identity::{TokenVerifier, Verification, VerificationRequest, VerifyError};

use crate::clients::AccountDirectory;
use crate::services::token::TokenCodec;

#[derive(Clone)]
pub struct LocalVerifier {
    codec: Arc<TokenCodec>,
    directory: Arc<dyn AccountDirectory>,
}

impl LocalVerifier {
    pub fn new(codec: Arc<TokenCodec>, directory: Arc<dyn AccountDirectory>) -> Self {
        Self { codec, directory }
    }
}

#[async_trait]
impl TokenVerifier for LocalVerifier {
    async fn validate_user(&self, req: VerificationRequest) -> Result<Verification, VerifyError> {
        req.precheck()?;

        let claims = self.codec.decode(&req.token)?;

        let data = self
            .directory
            .account_details(claims.user_id)
            .await?
            .ok_or(VerifyError::UnknownAccount)?;

        let mut profile_id = 0;
        if req.is_profile_validate {
            let allowed = self
                .directory
                .validate_profile(req.profile_id, claims.user_id)
                .await?;
            if !allowed {
                return Err(VerifyError::ProfileNotAuthorized);
            }
            profile_id = req.profile_id;
        }

        debug!(subject_id = claims.user_id, profile_id, "user verified");
        Ok(Verification::verified(data, profile_id))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::{HashMap, HashSet};

    use serde_json::{Value, json};

    use identity::Subject;

    use super::*;
    use crate::clients::people::DirectoryError;
    use crate::services::token::TokenIssuer;

    /// In-memory directory: account 42 (active) owns profile 7, account 43 is inactive.
    #[derive(Default)]
    pub(crate) struct FakeDirectory {
        pub accounts: HashMap<i64, (Subject, bool)>,
        pub profiles: HashSet<(i64, i64)>,
        pub passwords: HashMap<String, String>,
        pub down: bool,
    }

    pub(crate) fn subject(id: i64) -> Subject {
        Subject {
            id,
            user_name: format!("user{id}"),
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            email: format!("user{id}@example.com"),
            account_type: 1,
            photo: None,
            is_active: true,
        }
    }

    impl FakeDirectory {
        pub(crate) fn seeded() -> Self {
            let mut dir = Self::default();
            dir.accounts.insert(42, (subject(42), true));
            dir.accounts.insert(43, (subject(43), false));
            dir.profiles.insert((7, 42));
            dir.passwords
                .insert("user42@example.com".into(), "correct horse".into());
            dir
        }

        fn check(&self) -> Result<(), DirectoryError> {
            if self.down {
                return Err(DirectoryError::Unavailable("connection refused".into()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl AccountDirectory for FakeDirectory {
        async fn account_details(&self, account_id: i64) -> Result<Option<Value>, DirectoryError> {
            self.check()?;
            Ok(self
                .accounts
                .get(&account_id)
                .filter(|(_, active)| *active)
                .map(|(s, _)| serde_json::to_value(s).unwrap()))
        }

        async fn validate_profile(&self, profile_id: i64, account_id: i64) -> Result<bool, DirectoryError> {
            self.check()?;
            Ok(self.profiles.contains(&(profile_id, account_id)))
        }

        async fn authenticate(&self, email: &str, password: &str) -> Result<Option<Subject>, DirectoryError> {
            self.check()?;
            if self.passwords.get(email).map(String::as_str) != Some(password) {
                return Ok(None);
            }
            Ok(self
                .accounts
                .values()
                .find(|(s, active)| *active && s.email == email)
                .map(|(s, _)| s.clone()))
        }
    }

    fn setup(directory: FakeDirectory) -> (LocalVerifier, TokenIssuer) {
        let codec = Arc::new(TokenCodec::new(b"verifier-secret"));
        (
            LocalVerifier::new(codec.clone(), Arc::new(directory)),
            TokenIssuer::new(codec, 1),
        )
    }

    #[tokio::test]
    async fn verifies_subject_and_returns_record() {
        let (verifier, issuer) = setup(FakeDirectory::seeded());
        let token = issuer.issue(42, None).unwrap().token;

        let v = verifier
            .validate_user(VerificationRequest::new(token))
            .await
            .unwrap();

        assert_eq!(v.status, 1);
        assert_eq!(v.profile_id, 0);
        assert_eq!(v.message, "User verified.");
        assert_eq!(v.data["id"], json!(42));
        assert_eq!(v.data["userName"], json!("user42"));
    }

    #[tokio::test]
    async fn owned_profile_is_echoed() {
        let (verifier, issuer) = setup(FakeDirectory::seeded());
        let token = issuer.issue(42, None).unwrap().token;

        let v = verifier
            .validate_user(VerificationRequest::new(token).with_profile(7))
            .await
            .unwrap();
        assert_eq!(v.profile_id, 7);
    }

    #[tokio::test]
    async fn foreign_profile_is_not_authorized() {
        let (verifier, issuer) = setup(FakeDirectory::seeded());
        let token = issuer.issue(42, None).unwrap().token;

        let err = verifier
            .validate_user(VerificationRequest::new(token).with_profile(8))
            .await
            .unwrap_err();
        assert_eq!(err, VerifyError::ProfileNotAuthorized);
    }

    #[tokio::test]
    async fn unknown_and_inactive_accounts() {
        let (verifier, issuer) = setup(FakeDirectory::seeded());

        for id in [43, 99] {
            let token = issuer.issue(id, None).unwrap().token;
            let err = verifier
                .validate_user(VerificationRequest::new(token))
                .await
                .unwrap_err();
            assert_eq!(err, VerifyError::UnknownAccount);
        }
    }

    #[tokio::test]
    async fn input_checks_come_first() {
        let (verifier, _) = setup(FakeDirectory {
            down: true,
            ..FakeDirectory::seeded()
        });

        let err = verifier
            .validate_user(VerificationRequest::new(""))
            .await
            .unwrap_err();
        assert_eq!(err, VerifyError::MissingCredential);

        let err = verifier
            .validate_user(VerificationRequest::new("x").with_profile(0))
            .await
            .unwrap_err();
        assert_eq!(err, VerifyError::MissingProfile);

        let err = verifier
            .validate_user(VerificationRequest::new("x.y.z"))
            .await
            .unwrap_err();
        assert_eq!(err, VerifyError::InvalidSignature);
    }

    #[tokio::test]
    async fn directory_outage_is_unavailable() {
        let (verifier, issuer) = setup(FakeDirectory {
            down: true,
            ..FakeDirectory::seeded()
        });
        let token = issuer.issue(42, None).unwrap().token;

        let err = verifier
            .validate_user(VerificationRequest::new(token))
            .await
            .unwrap_err();
        assert!(matches!(err, VerifyError::Unavailable(_)));
        assert!(!err.is_credential_problem());
    }
}

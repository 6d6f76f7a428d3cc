/*
 * Responsibility
 * - email + password の照合 (bcrypt)
 * - bcrypt は CPU を食うので spawn_blocking で runtime から外す
 */
use thiserror::Error;

use crate::repos::{AccountRow, AccountStore, RepoError};

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error("password check failed: {0}")]
    Hash(String),
}

/// Active account matching the credentials, `None` otherwise.
pub async fn authenticate(
    accounts: &dyn AccountStore,
    email: &str,
    password: &str,
) -> Result<Option<AccountRow>, CredentialError> {
    let Some(account) = accounts.find_by_email(email.trim()).await? else {
        return Ok(None);
    };

    let password = password.to_string();
    let hash = account.password_hash.clone();
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| CredentialError::Hash(e.to_string()))?
        .map_err(|e| CredentialError::Hash(e.to_string()))?;

    if !matches || !account.is_active {
        return Ok(None);
    }

    Ok(Some(account))
}

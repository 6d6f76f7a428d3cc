//! In-memory stores for tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::repos::{AccountRow, AccountStore, ProfileRow, ProfileStore, RepoError};

#[derive(Default)]
pub struct MemoryAccounts(pub Mutex<BTreeMap<i64, AccountRow>>);

#[derive(Default)]
pub struct MemoryProfiles(pub Mutex<BTreeMap<i64, ProfileRow>>);

pub fn account(id: i64, password_hash: &str, is_active: bool) -> AccountRow {
    AccountRow {
        id,
        user_name: format!("user{id}"),
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        email: format!("user{id}@example.com"),
        password_hash: password_hash.to_string(),
        account_type: 1,
        photo: None,
        is_active,
    }
}

pub fn profile(id: i64, account_id: i64, managed_by_id: Option<i64>) -> ProfileRow {
    ProfileRow {
        id,
        account_id,
        managed_by_id,
        first_name: "Profile".into(),
        last_name: id.to_string(),
        screen_name: format!("profile-{id}"),
    }
}

impl MemoryAccounts {
    pub fn with(rows: impl IntoIterator<Item = AccountRow>) -> Self {
        Self(Mutex::new(rows.into_iter().map(|r| (r.id, r)).collect()))
    }
}

impl MemoryProfiles {
    pub fn with(rows: impl IntoIterator<Item = ProfileRow>) -> Self {
        Self(Mutex::new(rows.into_iter().map(|r| (r.id, r)).collect()))
    }
}

#[async_trait]
impl AccountStore for MemoryAccounts {
    async fn find_by_id(&self, account_id: i64) -> Result<Option<AccountRow>, RepoError> {
        Ok(self.0.lock().unwrap().get(&account_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AccountRow>, RepoError> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .values()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}

#[async_trait]
impl ProfileStore for MemoryProfiles {
    async fn is_accessible(&self, profile_id: i64, account_id: i64) -> Result<bool, RepoError> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .get(&profile_id)
            .is_some_and(|p| p.account_id == account_id || p.managed_by_id == Some(account_id)))
    }

    async fn get(&self, profile_id: i64) -> Result<Option<ProfileRow>, RepoError> {
        Ok(self.0.lock().unwrap().get(&profile_id).cloned())
    }

    async fn list_for_account(&self, account_id: i64) -> Result<Vec<ProfileRow>, RepoError> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.account_id == account_id || p.managed_by_id == Some(account_id))
            .cloned()
            .collect())
    }

    async fn set_manager(
        &self,
        profile_id: i64,
        manager_id: Option<i64>,
    ) -> Result<Option<ProfileRow>, RepoError> {
        let mut rows = self.0.lock().unwrap();
        Ok(rows.get_mut(&profile_id).map(|p| {
            p.managed_by_id = manager_id;
            p.clone()
        }))
    }
}

/*
 * Responsibility
 * - profiles テーブル向け SQLx 操作
 * - 所有 (account_id) / 委任 (managed_by_id) の判定クエリ
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ProfileRow {
    pub id: i64,
    pub account_id: i64,
    pub managed_by_id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub screen_name: String,
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// True when `account_id` owns or co-manages `profile_id`.
    async fn is_accessible(&self, profile_id: i64, account_id: i64) -> Result<bool, RepoError>;

    async fn get(&self, profile_id: i64) -> Result<Option<ProfileRow>, RepoError>;

    /// Profiles owned by or delegated to `account_id`.
    async fn list_for_account(&self, account_id: i64) -> Result<Vec<ProfileRow>, RepoError>;

    /// `None` clears the co-manager. Returns the updated row, `None` when the profile is gone.
    async fn set_manager(
        &self,
        profile_id: i64,
        manager_id: Option<i64>,
    ) -> Result<Option<ProfileRow>, RepoError>;
}

#[derive(Clone, Debug)]
pub struct PgProfileStore {
    db: PgPool,
}

impl PgProfileStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn is_accessible(&self, profile_id: i64, account_id: i64) -> Result<bool, RepoError> {
        let found: Option<(i64,)> = sqlx::query_as(
            r#"
            SELECT id
            FROM profiles
            WHERE id = $1 AND (account_id = $2 OR managed_by_id = $2)
            "#,
        )
        .bind(profile_id)
        .bind(account_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(found.is_some())
    }

    async fn get(&self, profile_id: i64) -> Result<Option<ProfileRow>, RepoError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, account_id, managed_by_id, first_name, last_name, screen_name
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(profile_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn list_for_account(&self, account_id: i64) -> Result<Vec<ProfileRow>, RepoError> {
        let rows = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, account_id, managed_by_id, first_name, last_name, screen_name
            FROM profiles
            WHERE account_id = $1 OR managed_by_id = $1
            ORDER BY id
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    async fn set_manager(
        &self,
        profile_id: i64,
        manager_id: Option<i64>,
    ) -> Result<Option<ProfileRow>, RepoError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            UPDATE profiles
            SET managed_by_id = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, account_id, managed_by_id, first_name, last_name, screen_name
            "#,
        )
        .bind(profile_id)
        .bind(manager_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }
}

/*
 * Responsibility
 * - accounts テーブル向け SQLx 操作 (読み取りのみ)
 * - AccountRow → 公開レコード (Subject) への変換。password_hash は外に出さない
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use identity::Subject;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, FromRow)]
pub struct AccountRow {
    pub id: i64,
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub account_type: i32,
    pub photo: Option<String>,
    pub is_active: bool,
}

impl AccountRow {
    pub fn to_subject(&self) -> Subject {
        Subject {
            id: self.id,
            user_name: self.user_name.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            account_type: self.account_type,
            photo: self.photo.clone(),
            is_active: self.is_active,
        }
    }
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_id(&self, account_id: i64) -> Result<Option<AccountRow>, RepoError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<AccountRow>, RepoError>;
}

#[derive(Clone, Debug)]
pub struct PgAccountStore {
    db: PgPool,
}

impl PgAccountStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_id(&self, account_id: i64) -> Result<Option<AccountRow>, RepoError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, user_name, first_name, last_name, email, password_hash,
                   account_type, photo, is_active
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(account_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AccountRow>, RepoError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, user_name, first_name, last_name, email, password_hash,
                   account_type, photo, is_active
            FROM accounts
            WHERE lower(email) = lower($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }
}

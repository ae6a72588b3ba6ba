// src/users/directory.rs
//! Identity id → {name, email} lookups

use async_trait::async_trait;
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::debug;

use super::models::User;
use crate::common::{safe_email_log, StoreError};

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Full listing; privileged, no per-user authorization
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    async fn find_user(&self, id: &str) -> Result<Option<User>, StoreError>;

    async fn upsert_user(&self, id: &str, name: &str, email: &str) -> Result<User, StoreError>;
}

/// Snapshot of a directory listing indexed by identity id
#[derive(Debug, Default)]
pub struct UserIndex {
    by_id: HashMap<String, User>,
}

impl UserIndex {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            by_id: users.into_iter().map(|u| (u.id.clone(), u)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&User> {
        self.by_id.get(id)
    }

    /// Resolves ids in order, silently dropping unknown ones
    pub fn resolve_all<'a>(&'a self, ids: &'a [String]) -> impl Iterator<Item = &'a User> + 'a {
        ids.iter().filter_map(move |id| self.get(id))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }
}

#[derive(Debug, Clone)]
pub struct SqliteUserDirectory {
    pool: SqlitePool,
}

impl SqliteUserDirectory {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for SqliteUserDirectory {
    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, name, email, created_at, updated_at FROM users ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn find_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, created_at, updated_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn upsert_user(&self, id: &str, name: &str, email: &str) -> Result<User, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email) VALUES (?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                email = excluded.email,
                updated_at = datetime('now')
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .execute(&self.pool)
        .await?;

        debug!(user_id = %id, email = %safe_email_log(email), "Directory entry upserted");

        self.find_user(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("user {}", id)))
    }
}

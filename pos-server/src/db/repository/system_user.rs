//! System User Repository (staff accounts)

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::SystemUser;
use crate::utils::time::now_secs;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "system_user";

#[derive(Clone)]
pub struct SystemUserRepository {
    base: BaseRepository,
}

impl SystemUserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<SystemUser>> {
        let Ok(record_id) = id.parse::<RecordId>() else {
            return Ok(None);
        };
        let user: Option<SystemUser> = self.base.db().select(record_id).await?;
        Ok(user)
    }

    /// Find user by username (login key)
    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<SystemUser>> {
        let username_owned = username.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM system_user WHERE username = $username LIMIT 1")
            .bind(("username", username_owned))
            .await?;
        let users: Vec<SystemUser> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a new staff account. Password must already be hashed.
    pub async fn create(&self, user: SystemUser) -> RepoResult<SystemUser> {
        // Check duplicate username
        if self.find_by_username(&user.username).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Username '{}' already exists",
                user.username
            )));
        }

        let created: Option<SystemUser> = self.base.db().create(TABLE).content(user).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Stamp lastLogin after a successful login
    pub async fn update_last_login(&self, id: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $id SET lastLogin = $now, updatedAt = $now")
            .bind(("id", id.clone()))
            .bind(("now", now_secs()))
            .await?;
        Ok(())
    }

    /// Replace the password hash
    pub async fn update_password(&self, id: &RecordId, password_hash: String) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $id SET passwordHash = $hash, updatedAt = $now")
            .bind(("id", id.clone()))
            .bind(("hash", password_hash))
            .bind(("now", now_secs()))
            .await?;
        Ok(())
    }
}

//! System User Model (staff accounts)

use argon2::Argon2;
use argon2::password_hash::{
    Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};
use serde::{Deserialize, Serialize};
use shared::Timestamp;
use surrealdb::RecordId;

use super::serde_helpers;

/// Staff account matching the store schema
///
/// 完整模型 (含密码哈希) 只在服务端和数据库之间流转，
/// handler 对外一律返回 [`UserInfo`]。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemUser {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub username: String,
    pub password_hash: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

fn default_true() -> bool {
    true
}

/// Public projection of a staff account, safe to hand to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub name: String,
    pub role: String,
    pub permissions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl SystemUser {
    /// Argon2 校验，哈希格式非法时报错而不是静默返回 false
    pub fn verify_password(&self, password: &str) -> Result<bool, HashError> {
        let parsed = PasswordHash::new(&self.password_hash)?;
        let outcome = Argon2::default().verify_password(password.as_bytes(), &parsed);
        Ok(outcome.is_ok())
    }

    /// Argon2 哈希，盐由 OsRng 生成
    pub fn hash_password(password: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        Ok(Argon2::default()
            .hash_password(password.as_bytes(), &salt)?
            .to_string())
    }
}

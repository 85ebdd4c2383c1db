//! JWT 令牌服务
//!
//! 签发和校验访问/刷新令牌对。访问令牌携带权限快照供中间件就地判权，
//! 刷新令牌只能在 `/api/auth/refresh` 换新令牌对。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use shared::Permission;
use thiserror::Error;

/// 访问令牌类型标记
pub const TOKEN_TYPE_ACCESS: &str = "access";
/// 刷新令牌类型标记
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

/// JWT 配置
///
/// 密钥来自 `JWT_SECRET`；开发构建缺省时现场生成一把临时密钥，
/// 发布构建直接拒绝启动。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// 签名密钥 (至少 32 字节)
    pub secret: String,
    /// 访问令牌有效期 (分钟)
    pub expiration_minutes: i64,
    /// 刷新令牌有效期 (分钟)
    pub refresh_expiration_minutes: i64,
    /// 签发者 (iss)
    pub issuer: String,
    /// 受众 (aud)
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: resolve_secret(),
            expiration_minutes: env_minutes("JWT_EXPIRATION_MINUTES", 1440),
            refresh_expiration_minutes: env_minutes("JWT_REFRESH_EXPIRATION_MINUTES", 10080),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "pos-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "pos-clients".to_string()),
        }
    }
}

fn env_minutes(name: &str, default: i64) -> i64 {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// 解析签名密钥
///
/// `JWT_SECRET` 设置且长度达标时直接采用。缺失或过短：
/// 开发构建生成随机临时密钥并告警，发布构建 panic 终止启动。
fn resolve_secret() -> String {
    match std::env::var("JWT_SECRET") {
        Ok(secret) if secret.len() >= 32 => secret,
        Ok(_) => reject_secret("JWT_SECRET is shorter than 32 characters"),
        Err(_) => reject_secret("JWT_SECRET not set"),
    }
}

#[cfg(debug_assertions)]
fn reject_secret(reason: &str) -> String {
    tracing::warn!("⚠️  {}! Generating a temporary development key.", reason);
    development_secret()
}

#[cfg(not(debug_assertions))]
fn reject_secret(reason: &str) -> String {
    panic!("🚨 FATAL: {} - refusing to start in production", reason);
}

/// 生成开发环境用的随机可打印密钥
#[cfg(debug_assertions)]
fn development_secret() -> String {
    use ring::rand::{SecureRandom, SystemRandom};

    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

    let rng = SystemRandom::new();
    let mut raw = [0u8; 48];
    if rng.fill(&mut raw).is_err() {
        // 随机源不可用时退回固定开发密钥
        return "pos-server-development-only-key-2025".to_string();
    }

    raw.iter()
        .map(|b| CHARSET[*b as usize % CHARSET.len()] as char)
        .collect()
}

/// JWT Claims
///
/// `sub` 是用户 record id，`permissions` 为逗号拼接的权限列表，
/// `token_type` 区分访问令牌与刷新令牌。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub role: String,
    pub permissions: String,
    pub token_type: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("无效令牌: {0}")]
    InvalidToken(String),

    #[error("令牌已过期")]
    ExpiredToken,

    #[error("无效签名")]
    InvalidSignature,

    #[error("令牌生成失败: {0}")]
    GenerationFailed(String),
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
            ErrorKind::InvalidSignature => JwtError::InvalidSignature,
            _ => JwtError::InvalidToken(e.to_string()),
        }
    }
}

/// JWT 令牌服务
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 签发访问令牌 (携带权限快照)
    pub fn generate_token(
        &self,
        user_id: &str,
        username: &str,
        role: &str,
        permissions: &[String],
    ) -> Result<String, JwtError> {
        self.sign(
            user_id,
            username,
            role,
            permissions,
            TOKEN_TYPE_ACCESS,
            self.config.expiration_minutes,
        )
    }

    /// 签发刷新令牌
    ///
    /// 不携带权限，换新时从数据库重读用户，角色变更随刷新生效。
    pub fn generate_refresh_token(
        &self,
        user_id: &str,
        username: &str,
        role: &str,
    ) -> Result<String, JwtError> {
        self.sign(
            user_id,
            username,
            role,
            &[],
            TOKEN_TYPE_REFRESH,
            self.config.refresh_expiration_minutes,
        )
    }

    fn sign(
        &self,
        user_id: &str,
        username: &str,
        role: &str,
        permissions: &[String],
        token_type: &str,
        valid_minutes: i64,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            role: role.to_string(),
            permissions: permissions.join(","),
            token_type: token_type.to_string(),
            exp: (now + Duration::minutes(valid_minutes)).timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 验证并解码令牌 (不区分类型)
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }

    /// 验证访问令牌，拒绝其它类型
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = self.validate_token(token)?;
        if claims.token_type != TOKEN_TYPE_ACCESS {
            return Err(JwtError::InvalidToken("Not an access token".to_string()));
        }
        Ok(claims)
    }

    /// 验证刷新令牌，拒绝其它类型
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = self.validate_token(token)?;
        if claims.token_type != TOKEN_TYPE_REFRESH {
            return Err(JwtError::InvalidToken("Not a refresh token".to_string()));
        }
        Ok(claims)
    }

    /// 从 Authorization 头提取 Bearer 令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// 当前用户上下文
///
/// 认证中间件从访问令牌解出后塞进请求扩展，处理函数经提取器取用。
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    pub role: String,
    pub permissions: Vec<String>,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            username: claims.username,
            role: claims.role,
            permissions: claims
                .permissions
                .split(',')
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

impl CurrentUser {
    /// 管理员角色拥有全部权限
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    /// 权限检查
    ///
    /// 通配符规则见 [`shared::Permission::grants`]：`"all"` / `"*"`
    /// 放行一切，`"product:*"` 匹配 `product:` 前缀下的所有动作。
    pub fn has_permission(&self, permission: &str) -> bool {
        if self.is_admin() {
            return true;
        }

        self.permissions
            .iter()
            .any(|p| Permission(p.clone()).grants(permission))
    }
}

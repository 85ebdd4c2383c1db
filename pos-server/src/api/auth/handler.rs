//! Authentication Handlers
//!
//! Handles login, registration, token refresh and password management

use std::time::Duration;

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};
use shared::ApiResponse;

use crate::auth::{CurrentUser, get_role_permissions, is_valid_role};
use crate::core::ServerState;
use crate::db::models::{SystemUser, UserInfo};
use crate::db::repository::SystemUserRepository;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_PASSWORD_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult, ok_with_message, time};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

// ==================== Request / Response DTOs ====================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub refresh_token: String,
    pub user: UserInfo,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "staff".to_string()
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub token: String,
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// 用户公开信息 (角色权限按角色表展开)
fn user_info(user: &SystemUser) -> UserInfo {
    UserInfo {
        id: user.id.as_ref().map(|r| r.to_string()).unwrap_or_default(),
        username: user.username.clone(),
        name: user.name.clone(),
        role: user.role.clone(),
        permissions: get_role_permissions(&user.role),
        avatar: user.avatar.clone(),
    }
}

// ==================== Handlers ====================

/// POST /api/auth/login - 用户登录
///
/// Authenticates user credentials and returns an access / refresh token pair
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let repo = SystemUserRepository::new(state.get_db());
    let username = req.username.clone();

    let user = repo.find_by_username(&username).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Check authentication result - unified error message to prevent username enumeration
    let user = match user {
        Some(u) => {
            // User found - check active status
            if !u.is_active {
                return Err(AppError::forbidden("Account has been disabled".to_string()));
            }

            // Verify password
            let password_valid = u
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

            if !password_valid {
                tracing::warn!(username = %username, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }

            u
        }
        None => {
            tracing::warn!(username = %username, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    // Generate JWT token pair
    let jwt_service = state.get_jwt_service();
    let user_id = user.id.as_ref().map(|r| r.to_string()).unwrap_or_default();
    let permissions = get_role_permissions(&user.role);

    let token = jwt_service
        .generate_token(&user_id, &user.username, &user.role, &permissions)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;
    let refresh_token = jwt_service
        .generate_refresh_token(&user_id, &user.username, &user.role)
        .map_err(|e| AppError::internal(format!("Failed to generate refresh token: {}", e)))?;

    // Record last login time
    if let Some(id) = &user.id {
        repo.update_last_login(id).await?;
    }

    tracing::info!(
        user_id = %user_id,
        username = %user.username,
        role = %user.role,
        "User logged in successfully"
    );

    Ok(Json(LoginResponse {
        token,
        refresh_token,
        user: user_info(&user),
    }))
}

/// POST /api/auth/register - 用户注册
///
/// 开放注册，角色缺省为 staff
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<RegisterResponse>> {
    validate_required_text(&req.username, "username", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&req.password, "password", MAX_PASSWORD_LEN)?;
    validate_required_text(&req.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&req.phone, "phone", MAX_SHORT_TEXT_LEN)?;

    if !is_valid_role(&req.role) {
        return Err(AppError::validation(format!("Unknown role: {}", req.role)));
    }

    let password_hash = SystemUser::hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {}", e)))?;

    let now = time::now_secs();
    let repo = SystemUserRepository::new(state.get_db());
    let user = repo
        .create(SystemUser {
            id: None,
            username: req.username.clone(),
            password_hash,
            name: req.name,
            phone: req.phone,
            role: req.role,
            avatar: None,
            is_active: true,
            last_login: None,
            created_at: now,
            updated_at: now,
        })
        .await?;

    let id = user.id.as_ref().map(|r| r.to_string()).unwrap_or_default();
    tracing::info!(user_id = %id, username = %user.username, "User registered");

    Ok(Json(RegisterResponse {
        id,
        username: user.username,
    }))
}

/// POST /api/auth/refresh - 刷新令牌
///
/// 验证刷新令牌后重新读取用户并签发新的令牌对
pub async fn refresh(
    State(state): State<ServerState>,
    Json(req): Json<RefreshRequest>,
) -> AppResult<Json<RefreshResponse>> {
    let jwt_service = state.get_jwt_service();

    let claims = jwt_service
        .validate_refresh_token(&req.refresh_token)
        .map_err(|e| match e {
            crate::auth::JwtError::ExpiredToken => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid refresh token"),
        })?;

    // Re-read the user so role changes and deactivation take effect on refresh
    let repo = SystemUserRepository::new(state.get_db());
    let user = repo
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(|| AppError::invalid_token("User no longer exists"))?;

    if !user.is_active {
        return Err(AppError::forbidden("Account has been disabled".to_string()));
    }

    let user_id = user.id.as_ref().map(|r| r.to_string()).unwrap_or_default();
    let permissions = get_role_permissions(&user.role);

    let token = jwt_service
        .generate_token(&user_id, &user.username, &user.role, &permissions)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;
    let refresh_token = jwt_service
        .generate_refresh_token(&user_id, &user.username, &user.role)
        .map_err(|e| AppError::internal(format!("Failed to generate refresh token: {}", e)))?;

    Ok(Json(RefreshResponse {
        token,
        refresh_token,
    }))
}

/// GET /api/auth/me - 获取当前用户信息
///
/// 从数据库重新读取，保证角色与头像为最新值
pub async fn me(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<UserInfo>> {
    let repo = SystemUserRepository::new(state.get_db());
    let user = repo
        .find_by_id(&current_user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", current_user.id)))?;

    Ok(Json(user_info(&user)))
}

/// POST /api/auth/change-password - 修改密码
pub async fn change_password(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(req): Json<ChangePasswordRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    validate_required_text(&req.new_password, "newPassword", MAX_PASSWORD_LEN)?;

    let repo = SystemUserRepository::new(state.get_db());
    let user = repo
        .find_by_id(&current_user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", current_user.id)))?;

    let old_valid = user
        .verify_password(&req.old_password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
    if !old_valid {
        return Err(AppError::validation("Old password is incorrect"));
    }

    let password_hash = SystemUser::hash_password(&req.new_password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {}", e)))?;

    if let Some(id) = &user.id {
        repo.update_password(id, password_hash).await?;
    }

    tracing::info!(user_id = %current_user.id, "Password changed");

    Ok(ok_with_message((), "Password changed successfully"))
}

/// POST /api/auth/logout - 用户登出
///
/// JWT 无服务端状态，登出由客户端丢弃令牌完成，这里仅返回确认
pub async fn logout(
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<()>>> {
    tracing::info!(
        user_id = %current_user.id,
        username = %current_user.username,
        "User logged out"
    );

    Ok(ok_with_message((), "Logged out successfully"))
}

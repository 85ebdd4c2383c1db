//! 统一错误处理
//!
//! [`AppError`] 是处理函数和服务层的唯一错误类型，`IntoResponse` 把它
//! 渲染成 [`shared::ApiResponse`] 信封。数据响应直接返回 `Json<T>`，
//! 只有无数据的确认类接口走 [`ok_with_message`]。
//!
//! # 错误码
//!
//! | 码 | 状态 | 含义 |
//! |----|------|------|
//! | E0002 | 400 | 验证失败 |
//! | E0003 | 404 | 资源不存在 |
//! | E0004 | 409 | 资源冲突 |
//! | E0005 | 422 | 业务规则违反 |
//! | E0006 | 400 | 无效请求 |
//! | E2001 | 403 | 无权限 |
//! | E3001 | 401 | 未登录 |
//! | E3002 | 401 | 无效令牌 |
//! | E3003 | 401 | 令牌过期 |
//! | E9001 | 500 | 内部错误 |
//! | E9002 | 500 | 数据库错误 |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use shared::ApiResponse;
use tracing::error;

/// Application-level Result type used in HTTP handlers and services
pub type AppResult<T> = Result<T, AppError>;

/// 应用错误枚举
///
/// 认证三态 (未登录/过期/无效) 拆成独立变体，中间件据此挑状态码；
/// 业务错误一律携带对客户端可见的消息。
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== 认证错误 (401/403) ==========
    #[error("Authentication required")]
    Unauthorized,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Permission denied: {0}")]
    Forbidden(String),

    // ========== 业务逻辑错误 (4xx) ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource already exists: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    #[error("Invalid request: {0}")]
    Invalid(String),

    // ========== 系统错误 (5xx) ==========
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP 状态码与对外错误码
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "E3001"),
            AppError::InvalidToken(_) => (StatusCode::UNAUTHORIZED, "E3002"),
            AppError::TokenExpired => (StatusCode::UNAUTHORIZED, "E3003"),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "E2001"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "E0002"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "E0003"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "E0004"),
            AppError::BusinessRule(_) => (StatusCode::UNPROCESSABLE_ENTITY, "E0005"),
            AppError::Invalid(_) => (StatusCode::BAD_REQUEST, "E0006"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "E9001"),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "E9002"),
        }
    }

    /// 对客户端可见的消息，5xx 的细节只进日志不出门
    fn public_message(&self) -> &str {
        match self {
            AppError::Unauthorized => "Please login first",
            AppError::TokenExpired => "Token expired",
            AppError::Database(_) => "Database error",
            AppError::Internal(_) => "Internal server error",
            AppError::InvalidToken(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::Validation(msg)
            | AppError::BusinessRule(msg)
            | AppError::Invalid(msg) => msg,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Database(detail) => {
                error!(target: "database", error = %detail, "Database error occurred");
            }
            AppError::Internal(detail) => {
                error!(target: "internal", error = %detail, "Internal error occurred");
            }
            _ => {}
        }

        let (status, code) = self.status_and_code();
        let body = Json(ApiResponse::<()>::error(code, self.public_message()));
        (status, body).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn unauthorized() -> Self {
        Self::Unauthorized
    }

    pub fn token_expired() -> Self {
        Self::TokenExpired
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::InvalidToken(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn business_rule(msg: impl Into<String>) -> Self {
        Self::BusinessRule(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// 登录失败的统一提示，不区分用户不存在和密码错误
    pub fn invalid_credentials() -> Self {
        Self::Invalid("Invalid username or password".to_string())
    }
}

/// 无数据的确认响应 (修改密码、登出这类接口)
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<ApiResponse<T>> {
    Json(ApiResponse::ok_with_message(data, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_match_the_wire_contract() {
        let cases = [
            (AppError::unauthorized(), StatusCode::UNAUTHORIZED, "E3001"),
            (
                AppError::invalid_token("bad"),
                StatusCode::UNAUTHORIZED,
                "E3002",
            ),
            (AppError::token_expired(), StatusCode::UNAUTHORIZED, "E3003"),
            (AppError::forbidden("no"), StatusCode::FORBIDDEN, "E2001"),
            (AppError::validation("v"), StatusCode::BAD_REQUEST, "E0002"),
            (AppError::not_found("x"), StatusCode::NOT_FOUND, "E0003"),
            (AppError::conflict("dup"), StatusCode::CONFLICT, "E0004"),
            (
                AppError::business_rule("rule"),
                StatusCode::UNPROCESSABLE_ENTITY,
                "E0005",
            ),
            (
                AppError::invalid_credentials(),
                StatusCode::BAD_REQUEST,
                "E0006",
            ),
            (
                AppError::internal("boom"),
                StatusCode::INTERNAL_SERVER_ERROR,
                "E9001",
            ),
            (
                AppError::database("io"),
                StatusCode::INTERNAL_SERVER_ERROR,
                "E9002",
            ),
        ];

        for (err, status, code) in cases {
            let (got_status, got_code) = err.status_and_code();
            assert_eq!(got_status, status, "{code}");
            assert_eq!(got_code, code);
        }
    }

    #[test]
    fn server_side_detail_is_redacted() {
        let err = AppError::database("connection pool exhausted at 10.0.0.3");
        assert_eq!(err.public_message(), "Database error");

        let err = AppError::internal("stack trace ...");
        assert_eq!(err.public_message(), "Internal server error");
    }
}

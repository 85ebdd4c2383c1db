//! CurrentUser 提取器
//!
//! 处理函数签名里写 `user: CurrentUser` 即可拿到认证上下文。
//! `require_auth` 已注入时直接复用；没经过中间件的路由就地验证，
//! 头缺失或格式不对一律按未登录处理。

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let token = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(JwtService::extract_from_header);
        let Some(token) = token else {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", parts.uri));
            return Err(AppError::unauthorized());
        };

        match state.get_jwt_service().validate_access_token(token) {
            Ok(claims) => {
                let user = CurrentUser::from(claims);
                // 缓存进扩展，同一请求里的后续提取不再重复验证
                parts.extensions.insert(user.clone());
                Ok(user)
            }
            Err(e) => {
                security_log!(
                    "WARN",
                    "auth_failed",
                    error = format!("{}", e),
                    uri = format!("{:?}", parts.uri)
                );
                Err(match e {
                    JwtError::ExpiredToken => AppError::token_expired(),
                    _ => AppError::invalid_token("Invalid token"),
                })
            }
        }
    }
}

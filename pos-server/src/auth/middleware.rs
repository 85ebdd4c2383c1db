//! 认证与授权中间件
//!
//! `require_auth` 挂在路由器顶层守住整个 `/api/` 面；`require_permission`
//! 按路由追加在需要特定权限的写操作上。

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

/// 无需令牌即可访问的 API 路径
const PUBLIC_API_ROUTES: &[&str] = &[
    "/api/auth/login",
    "/api/auth/register",
    "/api/auth/refresh",
];

/// CORS 预检、非 API 路径 (健康检查等) 和登录三件套不做认证
fn skips_auth(method: &http::Method, path: &str) -> bool {
    method == http::Method::OPTIONS
        || !path.starts_with("/api/")
        || PUBLIC_API_ROUTES.contains(&path)
}

/// 从 Authorization 头取出 Bearer 令牌
///
/// 头缺失报未登录 (E3001)，头存在但不是 Bearer 格式报无效令牌 (E3002)。
fn bearer_token(req: &Request) -> Result<&str, AppError> {
    let Some(header) = req.headers().get(http::header::AUTHORIZATION) else {
        security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
        return Err(AppError::unauthorized());
    };

    header
        .to_str()
        .ok()
        .and_then(JwtService::extract_from_header)
        .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))
}

/// 认证中间件
///
/// 验证访问令牌并把 [`CurrentUser`] 注入请求扩展。刷新令牌在这里
/// 过不去，只能走 `/api/auth/refresh` 换新。过期令牌报 401 E3003，
/// 其余验证失败报 401 E3002。
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if skips_auth(req.method(), req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let token = bearer_token(&req)?;

    let claims = state
        .get_jwt_service()
        .validate_access_token(token)
        .map_err(|e| {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );
            match e {
                JwtError::ExpiredToken => AppError::token_expired(),
                _ => AppError::invalid_token("Invalid token"),
            }
        })?;

    req.extensions_mut().insert(CurrentUser::from(claims));
    Ok(next.run(req).await)
}

/// 权限检查中间件工厂
///
/// 生成一个校验 `permission` 的路由层，挂在 `require_auth` 之后：
///
/// ```ignore
/// Router::new()
///     .route("/logs", post(handler::create_log))
///     .layer(middleware::from_fn(require_permission("inventory:manage")));
/// ```
///
/// 通配符规则见 [`CurrentUser::has_permission`]；无权限返回 403 E2001。
pub fn require_permission(
    permission: &'static str,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or(AppError::unauthorized())?;

            if !user.has_permission(permission) {
                security_log!(
                    "WARN",
                    "permission_denied",
                    user_id = user.id.clone(),
                    username = user.username.clone(),
                    required_permission = permission
                );
                return Err(AppError::forbidden(format!(
                    "Permission denied: {}",
                    permission
                )));
            }

            Ok(next.run(req).await)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::skips_auth;
    use http::Method;

    #[test]
    fn public_surface_is_exact() {
        assert!(skips_auth(&Method::OPTIONS, "/api/orders"));
        assert!(skips_auth(&Method::GET, "/health"));
        assert!(skips_auth(&Method::POST, "/api/auth/login"));
        assert!(skips_auth(&Method::POST, "/api/auth/register"));
        assert!(skips_auth(&Method::POST, "/api/auth/refresh"));

        assert!(!skips_auth(&Method::GET, "/api/orders"));
        assert!(!skips_auth(&Method::POST, "/api/auth/logout"));
        assert!(!skips_auth(&Method::GET, "/api/auth/me"));
    }
}

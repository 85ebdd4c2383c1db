//! HTTP 服务装配
//!
//! 路由器分两段初始化：`new` 只留端口，`initialize` 在 ServerState
//! 就绪后把带状态的路由器写进 OnceLock。`oneshot` 供测试直接驱动
//! 路由器，不监听端口。

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};

use axum::{Router, middleware};
use tower::Service;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;

use crate::auth::require_auth;
use crate::core::{Config, ServerState};
use crate::utils::AppError;

pub type OneshotResult =
    Result<http::Response<axum::body::Body>, Box<dyn std::error::Error + Send + Sync>>;

/// 请求访问日志，单独走 `http_access` target
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    tracing::info!(target: "http_access", "{} {} {}", method, uri, response.status());
    response
}

/// 组装全部资源路由 (未绑定状态)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        // Core APIs
        .merge(crate::api::auth::router())
        .merge(crate::api::health::router())
        .merge(crate::api::ai::router())
        // Catalog APIs
        .merge(crate::api::categories::router())
        .merge(crate::api::suppliers::router())
        .merge(crate::api::products::router())
        // Floor APIs
        .merge(crate::api::tables::router())
        .merge(crate::api::reservations::router())
        // Customer APIs
        .merge(crate::api::members::router())
        // Sales and stock APIs
        .merge(crate::api::orders::router())
        .merge(crate::api::inventory::router())
        .merge(crate::api::analytics::router())
}

#[derive(Clone, Debug)]
pub struct HttpService {
    port: u16,
    router: Arc<OnceLock<Router>>,
}

impl HttpService {
    pub fn new(config: Config) -> Self {
        Self {
            port: config.http_port,
            router: Arc::new(OnceLock::new()),
        }
    }

    /// 绑定状态并缓存路由器，ServerState 完全初始化后调用一次
    pub fn initialize(&self, state: ServerState) {
        let app = build_app()
            // 认证在 Router 顶层统一处理，require_auth 内部放行公共路由
            .layer(middleware::from_fn_with_state(state.clone(), require_auth))
            .with_state(state)
            .layer(CorsLayer::permissive())
            .layer(CompressionLayer::new())
            .layer(middleware::from_fn(log_request));

        if self.router.set(app).is_err() {
            tracing::warn!("HttpService router already initialized");
        }
    }

    pub fn router(&self) -> Option<Router> {
        self.router.get().cloned()
    }

    /// 直接调用路由器处理单个请求 (测试用，不监听端口)
    pub async fn oneshot(&self, request: http::Request<axum::body::Body>) -> OneshotResult {
        let Some(mut service) = self.router() else {
            return Err(AppError::internal("HttpService not initialized").into());
        };

        let response = service
            .call(request)
            .await
            .map_err(|_| AppError::internal("Router call failed"))?;
        Ok(response)
    }

    /// 监听端口并服务请求，直到 shutdown 信号触发
    pub async fn start_server<F>(&self, shutdown_signal: F) -> Result<(), AppError>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let app = self
            .router()
            .ok_or_else(|| AppError::internal("HttpService not initialized with router"))?;

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        tracing::info!("🚀 HTTP server listening on {}", addr);

        let handle = axum_server::Handle::new();

        let shutdown_handle = handle.clone();
        tokio::spawn(async move {
            shutdown_signal.await;
            shutdown_handle.graceful_shutdown(Some(std::time::Duration::from_secs(10)));
        });

        axum_server::bind(addr)
            .handle(handle)
            .serve(app.into_make_service())
            .await
            .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

        Ok(())
    }
}

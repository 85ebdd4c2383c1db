//! 健康检查
//!
//! `GET /health` 在认证中间件处直接放行，监控探针不需要 token。

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::core::ServerState;
use crate::utils::time::now_secs;

/// `{"status":"healthy","timestamp":1756080000,"version":"0.1.0"}`
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    /// 服务器时间 (Unix 秒)
    timestamp: i64,
    version: &'static str,
}

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: now_secs(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

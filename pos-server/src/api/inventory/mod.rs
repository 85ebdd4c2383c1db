//! Inventory Ledger API 模块
//!
//! 库存台账：只追加，不修改。写入需要 `inventory:manage` 权限。

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/inventory", routes())
}

fn routes() -> Router<ServerState> {
    let write_routes = Router::new()
        .route("/logs", post(handler::create_log))
        .layer(middleware::from_fn(require_permission("inventory:manage")));

    Router::new()
        .route("/logs", get(handler::list_logs))
        .merge(write_routes)
}

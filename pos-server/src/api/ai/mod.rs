//! AI 经营助手 API 模块

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/ai", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/insight", post(handler::insight))
        .route("/product-description", post(handler::product_description))
        .route("/status", get(handler::status))
}

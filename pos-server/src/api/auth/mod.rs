//! Authentication Routes

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

/// Build authentication router
/// - /api/auth/login, /api/auth/register, /api/auth/refresh: public (no auth required)
/// - /api/auth/me, /api/auth/change-password, /api/auth/logout: protected
///   (auth middleware handled at Router level)
pub fn router() -> Router<ServerState> {
    Router::new()
        // Public routes - no auth middleware applied
        .route("/api/auth/login", post(handler::login))
        .route("/api/auth/register", post(handler::register))
        .route("/api/auth/refresh", post(handler::refresh))
        // Protected routes - require authentication (handled by global require_auth middleware)
        .route("/api/auth/me", get(handler::me))
        .route("/api/auth/change-password", post(handler::change_password))
        .route("/api/auth/logout", post(handler::logout))
}

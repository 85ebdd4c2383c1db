//! 服务层 - HTTP 服务与外部集成
//!
//! - [`HttpService`] - Axum 路由装配与服务器启动
//! - [`AiService`] - Gemini AI 代理

pub mod ai;
pub mod http;

pub use ai::{AiService, AiStatus};
pub use http::HttpService;

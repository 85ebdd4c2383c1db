//! POS Server - 门店销售与库存管理后端
//!
//! 单体 axum 服务，嵌入式 SurrealDB 存储，不依赖外部数据库。
//! 订单、库存台账、每日汇总是核心域；目录 (分类/商品/供应商)、
//! 桌台/预订、会员和 AI 经营助手围绕其展开。
//!
//! 模块划分：`core` 负责配置和启动，`auth` 负责 JWT 与权限，
//! `api` 是路由和 handler，`db` 是模型与仓库层，`services` 放
//! HTTP 装配和外部集成，`utils` 放错误、金额、时间等通用件。

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::logger::init_logger_with_file;
pub use utils::{AppError, AppResult};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
    ____  ____  _____
   / __ \/ __ \/ ___/
  / /_/ / / / /\__ \
 / ____/ /_/ /___/ /
/_/    \____//____/
   _____
  / ___/___  ______   _____  _____
  \__ \/ _ \/ ___/ | / / _ \/ ___/
 ___/ /  __/ /   | |/ /  __/ /
/____/\___/_/    |___/\___/_/
    "#
    );
}

//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] / [`AppResult`] - 应用错误类型
//! - [`money`] - rust_decimal 货币计算
//! - [`time`] - UTC 时间戳与日期桶
//! - 校验与日志工具

pub mod error;
pub mod logger;
pub mod money;
pub mod time;
pub mod validation;

pub use error::{AppError, AppResult, ok_with_message};

use std::path::{Path, PathBuf};

use crate::auth::JwtConfig;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// 服务器配置
///
/// 全部来自环境变量，未设置时取默认值：
///
/// - `WORK_DIR` (默认 `./pos-data`): 工作目录，存数据库和日志
/// - `HTTP_PORT` (默认 8000): HTTP 服务端口
/// - `ENVIRONMENT` (默认 development): 运行环境
/// - `AUTO_STOCK_DEDUCTION` (默认 false): 完成订单时自动扣减库存
/// - `GEMINI_API_KEY`: AI 助手密钥，缺省时 AI 返回离线回复
/// - `LOG_LEVEL` (默认 info): 日志级别，`RUST_LOG` 优先
/// - `LOG_DIR`: 日志文件目录，缺省时仅输出到控制台
///
/// JWT 相关的环境变量见 [`JwtConfig`]。
///
/// ```ignore
/// WORK_DIR=/data/pos HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub http_port: u16,
    pub jwt: JwtConfig,
    /// development | staging | production
    pub environment: String,

    /// 创建已完成订单时是否自动写入库存流水并扣减库存
    ///
    /// 关闭时订单与库存完全解耦，库存变动只能通过库存接口录入。
    pub auto_stock_deduction: bool,

    pub gemini_api_key: Option<String>,
    pub log_level: Option<String>,
    pub log_dir: Option<String>,
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        Self {
            work_dir: env_or("WORK_DIR", "./pos-data"),
            http_port: env_parsed("HTTP_PORT").unwrap_or(8000),
            jwt: JwtConfig::default(),
            environment: env_or("ENVIRONMENT", "development"),
            auto_stock_deduction: env_parsed("AUTO_STOCK_DEDUCTION").unwrap_or(false),
            gemini_api_key: std::env::var("GEMINI_API_KEY").ok(),
            log_level: std::env::var("LOG_LEVEL").ok(),
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }

    /// 测试用：指定工作目录和端口，其余沿用环境变量
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        Self {
            work_dir: work_dir.into(),
            http_port,
            ..Self::from_env()
        }
    }

    /// 数据库目录: `{work_dir}/database`
    pub fn database_dir(&self) -> PathBuf {
        Path::new(&self.work_dir).join("database")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        if let Some(dir) = &self.log_dir {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

//! Logging Infrastructure
//!
//! tracing-subscriber 控制台输出，可选按天滚动的文件输出。

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// 初始化全局日志
///
/// 过滤级别优先级：`RUST_LOG` 环境变量 > `log_level` 参数 > info。
/// `log_dir` 指向已存在的目录时，日志写入按天滚动的
/// `pos-server.*` 文件，否则只打到控制台。
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.unwrap_or("info")));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    match log_dir.map(Path::new).filter(|dir| dir.exists()) {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "pos-server");
            builder.with_writer(appender).init();
        }
        None => builder.init(),
    }
}

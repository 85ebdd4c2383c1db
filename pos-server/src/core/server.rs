//! Server Implementation
//!
//! 把已初始化的 [`ServerState`] 跑成一个可 Ctrl-C 停止的 HTTP 服务。
//! 监听地址由 [`crate::services::HttpService`] 在 start_server 时打印。

use crate::core::ServerState;
use crate::utils::AppResult;

pub struct Server {
    state: ServerState,
}

impl Server {
    pub fn new(state: ServerState) -> Self {
        Self { state }
    }

    /// 阻塞运行直到收到 Ctrl-C，随后优雅停机
    pub async fn run(&self) -> AppResult<()> {
        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        self.state.http.start_server(shutdown).await
    }
}

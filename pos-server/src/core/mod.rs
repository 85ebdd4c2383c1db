//! 核心模块
//!
//! [`Config`] 读环境变量，[`ServerState`] 把配置变成一组就绪的服务，
//! [`Server`] 负责跑起来和停下来。

pub mod config;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::Server;
pub use state::ServerState;

use pos_server::{Config, Server, ServerState, init_logger_with_file, print_banner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 只在本地开发用，生产环境直接注入环境变量
    dotenv::dotenv().ok();

    print_banner();

    let config = Config::from_env();
    init_logger_with_file(config.log_level.as_deref(), config.log_dir.as_deref());

    tracing::info!("🧾 POS Server starting ({} mode)...", config.environment);

    let state = ServerState::initialize(&config).await;

    let server = Server::new(state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}

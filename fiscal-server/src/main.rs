use fiscal_server::core::{Config, Server};
use fiscal_server::utils::logger::init_logger;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    init_logger(&config.log_level, config.log_dir.as_deref());

    info!(
        base_path = %config.base_path,
        executable = %config.executable,
        environment = %config.environment,
        "starting fiscal print server"
    );

    Server::new(config).run().await
}

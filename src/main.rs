use anyhow::Result;
use dotenvy::dotenv;
use log::info;
use valut::{config::ServerConfig, server::run_server};

#[actix_web::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();
    let config = ServerConfig::from_env_or_default();

    info!("Starting server on {}:{}", config.host, config.port);
    run_server(config).await?;
    info!("Bye!");

    Ok(())
}

use std::time::Duration;

use actix_web::{App, HttpServer, dev::Server, http::KeepAlive, middleware::Logger, web};
use log::*;

use crate::{
    api::RatesApi,
    config::ServerConfig,
    errors::ServerError,
    feed::RateFetcher,
    routes,
    store::{MemoryRateStore, PgRateStore, RateStore},
};

const DB_MAX_CONNECTIONS: u32 = 5;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let fetcher = RateFetcher::new(config.feed.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    match config.database_url.as_deref() {
        Some(url) => {
            let store = PgRateStore::connect(url, DB_MAX_CONNECTIONS)
                .await
                .map_err(|e| ServerError::InitializeError(e.to_string()))?;
            create_server_instance(&config, fetcher, store)?.await?;
        },
        None => {
            info!("Using the in-memory rate store");
            create_server_instance(&config, fetcher, MemoryRateStore::new())?.await?;
        },
    }
    Ok(())
}

pub fn create_server_instance<S>(config: &ServerConfig, fetcher: RateFetcher, store: S) -> Result<Server, ServerError>
where S: RateStore + Send + 'static {
    info!(
        "Rates come from {} ({} -> {}, symbols {})",
        config.feed.url,
        config.feed.feed_base,
        config.feed.target_base,
        config.feed.symbols.join(",")
    );
    let srv = HttpServer::new(move || {
        let api = RatesApi::new(fetcher.clone(), store.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("valut::access_log"))
            .app_data(web::Data::new(api))
            .configure(routes::configure::<S>)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

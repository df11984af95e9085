use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use car_market::{CarStore, Config, Server, app};

#[tokio::main]
async fn main() -> Result<(), car_market::Error> {
    let config = Config::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let store = if config.empty { CarStore::empty() } else { CarStore::seeded() };
    info!(
        version = env!("CARGO_PKG_VERSION"),
        seeded = !config.empty,
        "starting car market"
    );

    Server::bind(&config.addr)?.serve(app(Arc::new(store))).await
}

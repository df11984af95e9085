//! Command-line and environment configuration.

use clap::Parser;

/// Serve the car market over HTTP.
#[derive(Debug, Clone, Parser)]
#[command(name = "car_market", version, about)]
pub struct Config {
    /// Socket address to listen on.
    #[arg(long, env = "CAR_MARKET_ADDR", default_value = "127.0.0.1:5000")]
    pub addr: String,

    /// Log filter used when `RUST_LOG` is unset (e.g. `info`, `car_market=debug`).
    #[arg(long, env = "CAR_MARKET_LOG", default_value = "info")]
    pub log_level: String,

    /// Start with an empty market instead of the two seed cars.
    #[arg(long, env = "CAR_MARKET_EMPTY")]
    pub empty: bool,
}

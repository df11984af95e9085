//! # car_market
//!
//! An in-memory car market: a JSON REST API under `/cars` and a
//! server-rendered HTML interface under `/car-templ/`, both over one shared
//! [`CarStore`]. Nothing is persisted; a restart brings back the two seed
//! cars.
//!
//! The interesting parts are small:
//!
//! - [`sort`]: sort by any car field, numeric when every value is a number,
//!   case-insensitive text otherwise, stable in both directions.
//! - [`stats`]: count/min/avg/max per numeric field, with "no data" kept
//!   distinct from zero.
//!
//! The HTTP layer is a thin hyper server with a radix-tree router.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use car_market::{app, CarStore, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), car_market::Error> {
//!     let store = Arc::new(CarStore::seeded());
//!     Server::bind("127.0.0.1:5000")?.serve(app(store)).await
//! }
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod api;
pub mod car;
pub mod config;
pub mod health;
pub mod pages;
pub mod payload;
pub mod sort;
pub mod stats;
pub mod store;

use std::sync::Arc;

pub use car::{CarPatch, CarRecord, NewCar};
pub use config::Config;
pub use error::Error;
pub use handler::{Handler, with_state};
pub use method::Method;
pub use request::Request;
pub use response::{ContentType, IntoResponse, Json, Response};
pub use router::Router;
pub use server::Server;
pub use stats::Statistics;
pub use status::Status;
pub use store::{CarStore, StoreError};

/// The full application: REST API, HTML pages and health probes.
pub fn app(store: Arc<CarStore>) -> Router {
    let router = Router::new()
        .get("/healthz", health::liveness)
        .get("/readyz", with_state(&store, health::readiness));
    let router = api::mount(router, &store);
    pages::mount(router, &store)
}

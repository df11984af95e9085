//! Infrastructure error type.

use thiserror::Error;

/// Failures that stop the server itself: a bad bind address or socket I/O.
///
/// Request-level failures (unknown car, malformed body) never surface here.
/// Handlers turn them into HTTP [`Response`](crate::Response) values.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid bind address `{addr}`: {source}")]
    InvalidAddress {
        addr: String,
        source: std::net::AddrParseError,
    },
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

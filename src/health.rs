//! Liveness and readiness probes.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? |
//! | **Readiness** | `/readyz` | Can the store still serve requests? |

use std::sync::Arc;

use crate::store::CarStore;
use crate::{Request, Response, Status};

/// Always `200 OK` with body `"ok"`.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

/// `200 OK` with `"ready"` while the store lock is healthy, `503` once a
/// panic has poisoned it.
pub async fn readiness(store: Arc<CarStore>, _req: Request) -> Response {
    if store.is_available() {
        Response::text("ready")
    } else {
        Response::status(Status::ServiceUnavailable)
    }
}

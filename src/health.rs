//! Built-in Kubernetes health-check handlers.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? Failure → restart. |
//! | **Readiness** | `/readyz` | Can the pod serve traffic? Failure → pulled from the gateway backend pool. |
//!
//! ```rust,no_run
//! use azref::{Router, health};
//! use http::Method;
//!
//! let app = Router::new()
//!     .on(Method::GET, "/healthz", health::liveness)
//!     .on(Method::GET, "/readyz", health::readiness);
//! ```
//!
//! Probe responses pass through the middleware chain like any other, so an
//! application gateway probing `/readyz` also sees which pod answered.

use crate::{Request, Response};

/// Liveness probe. Always `200 OK` with body `"ok"`.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

/// Readiness probe (default implementation). `200 OK` with body `"ready"`.
///
/// Replace with your own handler when the pod needs a warm-up period or must
/// check its dependencies before taking traffic.
pub async fn readiness(_req: Request) -> Response {
    Response::text("ready")
}

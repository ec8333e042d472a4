//! # azref
//!
//! A minimal HTTP framework for pods running behind an application gateway,
//! and the middleware that tells you which pod answered.
//!
//! ## The contract
//!
//! The gateway handles TLS, rate limiting, slow clients and body-size limits.
//! azref does not. What is left is routing, a middleware chain, graceful
//! shutdown, and one piece of diagnostics every multi-replica deployment ends
//! up wanting: [`HeaderEnrichment`](middleware::HeaderEnrichment), which adds
//! to every response
//!
//! - `AzRef-AppGwIp`: the gateway hop, first entry of `X-Forwarded-For`
//! - `AzRef-NodeIp`: the node, from `MY_NODE_IP`
//! - `AzRef-PodName`: the pod, from `MY_POD_NAME`
//!
//! Missing values are sent as `null`.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use azref::{Request, Response, Router, Server, health};
//! use azref::middleware::HeaderEnrichment;
//! use http::Method;
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = Router::new()
//!         .on(Method::GET, "/users/{id}", get_user)
//!         .on(Method::GET, "/healthz",    health::liveness)
//!         .layer(HeaderEnrichment::from_env());
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await.unwrap();
//! }
//!
//! async fn get_user(req: Request) -> Response {
//!     let id = req.param("id").unwrap_or("unknown");
//!     Response::json(format!(r#"{{"id":"{id}"}}"#))
//! }
//! ```

mod config;
mod error;
mod handler;
mod request;
mod response;
mod router;
mod server;

pub mod health;
pub mod middleware;

pub use config::{NODE_IP_VAR, POD_NAME_VAR, PodIdentity};
pub use error::{BoxError, Error};
pub use handler::Handler;
pub use request::{Request, RequestBuilder};
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;

//! Middleware layer.
//!
//! Middleware intercepts requests and responses and is the right place for
//! cross-cutting concerns: diagnostic headers, request-id injection,
//! authentication-header inspection.
//!
//! # The chain
//!
//! Middleware is registered on the [`Router`](crate::Router) with
//! [`Router::layer`](crate::Router::layer). The first layer registered is the
//! outermost one. Each middleware receives the request and a [`Next`]
//! continuation for the rest of the chain:
//!
//! ```text
//! request → layer 0 → layer 1 → … → route handler (or 404)
//!                 ↑ next.run(req)      ↓
//! response ← layer 0 ← layer 1 ← … ← Response
//! ```
//!
//! [`Next::run`] consumes the continuation, so a middleware can call the rest
//! of the chain at most once. Returning without calling it short-circuits.
//!
//! # Errors
//!
//! A middleware may refuse to produce a response by returning
//! [`Error`](crate::Error). The error travels back through every outer layer
//! untouched and the server answers `500 Internal Server Error`.
//!
//! # Writing one
//!
//! ```rust
//! use azref::middleware::{self, Next};
//! use azref::{Error, Request, Response};
//!
//! async fn tag(req: Request, next: Next) -> Result<Response, Error> {
//!     let mut res = next.run(req).await?;
//!     res.headers_mut().append("x-tag", http::HeaderValue::from_static("1"));
//!     Ok(res)
//! }
//!
//! let layer = middleware::from_fn(tag);
//! ```

mod enrich;

pub use enrich::{APP_GW_IP, HeaderEnrichment, NODE_IP, POD_NAME, X_FORWARDED_FOR};

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::Error;
use crate::handler::BoxedHandler;
use crate::request::Request;
use crate::response::Response;

/// A heap-allocated future returned by [`Middleware::handle`].
pub type MiddlewareFuture = Pin<Box<dyn Future<Output = Result<Response, Error>> + Send + 'static>>;

/// One stage of the request pipeline.
pub trait Middleware: Send + Sync + 'static {
    /// Processes `req`, usually by calling `next.run(req)` exactly once.
    fn handle(&self, req: Request, next: Next) -> MiddlewareFuture;
}

pub(crate) type BoxedMiddleware = Arc<dyn Middleware>;

/// The remainder of the pipeline after the current middleware.
pub struct Next {
    chain: Arc<[BoxedMiddleware]>,
    pos: usize,
    endpoint: BoxedHandler,
}

impl Next {
    /// Runs the rest of the chain and resolves once it has produced a response.
    pub async fn run(self, req: Request) -> Result<Response, Error> {
        match self.chain.get(self.pos).cloned() {
            Some(middleware) => {
                let next = Self { pos: self.pos + 1, ..self };
                middleware.handle(req, next).await
            }
            None => Ok(self.endpoint.call(req).await),
        }
    }
}

/// A frozen middleware chain in front of an endpoint.
///
/// Built by [`Router::into_pipeline`](crate::Router::into_pipeline); the
/// server shares one instance across every connection.
pub struct Pipeline {
    chain: Arc<[BoxedMiddleware]>,
    endpoint: BoxedHandler,
}

impl Pipeline {
    pub(crate) fn new(chain: Vec<BoxedMiddleware>, endpoint: BoxedHandler) -> Self {
        Self { chain: chain.into(), endpoint }
    }

    /// Sends one request through the whole chain.
    pub async fn call(&self, req: Request) -> Result<Response, Error> {
        let next = Next {
            chain: Arc::clone(&self.chain),
            pos: 0,
            endpoint: Arc::clone(&self.endpoint),
        };
        next.run(req).await
    }
}

/// Turns an `async fn(Request, Next) -> Result<Response, Error>` into a
/// [`Middleware`].
pub fn from_fn<F, Fut>(f: F) -> FromFn<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, Error>> + Send + 'static,
{
    FromFn(f)
}

/// Middleware created by [`from_fn`].
pub struct FromFn<F>(F);

impl<F, Fut> Middleware for FromFn<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, Error>> + Send + 'static,
{
    fn handle(&self, req: Request, next: Next) -> MiddlewareFuture {
        Box::pin((self.0)(req, next))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use http::{HeaderValue, Method, StatusCode};

    use super::*;
    use crate::Router;

    fn tagger(tag: &'static str, log: Arc<Mutex<Vec<&'static str>>>) -> impl Middleware {
        from_fn(move |req, next: Next| {
            let log = Arc::clone(&log);
            async move {
                log.lock().unwrap().push(tag);
                let mut res = next.run(req).await?;
                res.headers_mut().append("x-order", HeaderValue::from_static(tag));
                Ok::<_, Error>(res)
            }
        })
    }

    #[tokio::test]
    async fn first_layer_is_outermost() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Router::new()
            .on(Method::GET, "/", |_req: Request| async { "ok" })
            .layer(tagger("outer", Arc::clone(&log)))
            .layer(tagger("inner", Arc::clone(&log)))
            .into_pipeline();

        let res = pipeline.call(Request::builder(Method::GET, "/").build()).await.unwrap();

        assert_eq!(*log.lock().unwrap(), ["outer", "inner"]);
        let order: Vec<_> = res.headers().get_all("x-order").iter().collect();
        assert_eq!(order, ["inner", "outer"]);
    }

    #[tokio::test]
    async fn short_circuit_skips_the_handler() {
        let pipeline = Router::new()
            .on(Method::GET, "/", |_req: Request| async { "handler" })
            .layer(from_fn(|_req, _next| async {
                Ok::<_, Error>(Response::status(StatusCode::FORBIDDEN))
            }))
            .into_pipeline();

        let res = pipeline.call(Request::builder(Method::GET, "/").build()).await.unwrap();
        assert_eq!(res.status_code(), StatusCode::FORBIDDEN);
        assert!(res.body().is_empty());
    }

    #[tokio::test]
    async fn errors_reach_the_caller() {
        let pipeline = Router::new()
            .on(Method::GET, "/", |_req: Request| async { "handler" })
            .layer(from_fn(|_req, _next| async { Err::<Response, _>(Error::middleware("denied")) }))
            .into_pipeline();

        let err = pipeline.call(Request::builder(Method::GET, "/").build()).await.unwrap_err();
        assert_eq!(err.to_string(), "middleware: denied");
    }
}

//! Minimal azref service: a couple of JSON endpoints, health probes and the
//! diagnostic headers.
//!
//! Run with:
//!   MY_NODE_IP=10.1.2.3 MY_POD_NAME=pod-abc123 RUST_LOG=info cargo run --example basic
//!
//! Try:
//!   curl -i -H 'x-forwarded-for: 203.0.113.5, 10.0.0.1' http://localhost:3000/users/42
//!   curl -i http://localhost:3000/healthz

use azref::middleware::HeaderEnrichment;
use azref::{Request, Response, Router, Server, health};
use http::{Method, StatusCode};

#[tokio::main]
async fn main() -> Result<(), azref::Error> {
    tracing_subscriber::fmt::init();

    let app = Router::new()
        .on(Method::GET,    "/users/{id}", get_user)
        .on(Method::POST,   "/users",      create_user)
        .on(Method::DELETE, "/users/{id}", delete_user)
        .on(Method::GET,    "/healthz",    health::liveness)
        .on(Method::GET,    "/readyz",     health::readiness)
        .layer(HeaderEnrichment::from_env());

    Server::bind("0.0.0.0:3000").serve(app).await
}

// GET /users/{id}
async fn get_user(req: Request) -> Response {
    let id = req.param("id").unwrap_or("unknown");
    Response::json(format!(r#"{{"id":"{id}","name":"alice"}}"#))
}

// POST /users
async fn create_user(req: Request) -> Response {
    if req.body().is_empty() {
        return Response::status(StatusCode::BAD_REQUEST);
    }

    Response::builder()
        .status(StatusCode::CREATED)
        .header("location", "/users/99")
        .json(r#"{"id":"99","name":"new_user"}"#)
}

// DELETE /users/{id} → 204 No Content
async fn delete_user(_req: Request) -> StatusCode {
    StatusCode::NO_CONTENT
}

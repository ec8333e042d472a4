//! End-to-end: a real server on an ephemeral port, spoken to over raw HTTP/1.1.

use std::net::SocketAddr;

use azref::middleware::{self, HeaderEnrichment};
use azref::{Error, PodIdentity, Request, Response, Router, Server};
use http::Method;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

struct TestServer {
    addr: SocketAddr,
    stop: oneshot::Sender<()>,
    handle: JoinHandle<Result<(), Error>>,
}

impl TestServer {
    async fn start(router: Router) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop, stopped) = oneshot::channel::<()>();
        let handle = tokio::spawn(
            Server::from_listener(listener).serve_with_shutdown(router, async move {
                let _ = stopped.await;
            }),
        );
        Self { addr, stop, handle }
    }

    async fn shutdown(self) {
        self.stop.send(()).unwrap();
        self.handle.await.unwrap().unwrap();
    }
}

/// Sends one request and returns the raw response text.
async fn send(addr: SocketAddr, path: &str, extra_headers: &[(&str, &str)]) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let mut head = format!("GET {path} HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n");
    for (name, value) in extra_headers {
        head.push_str(&format!("{name}: {value}\r\n"));
    }
    head.push_str("\r\n");
    stream.write_all(head.as_bytes()).await.unwrap();

    let mut raw = String::new();
    stream.read_to_string(&mut raw).await.unwrap();
    raw
}

/// Values of a header in a raw HTTP/1.1 response, in order.
fn header_values<'a>(raw: &'a str, name: &str) -> Vec<&'a str> {
    let head = raw.split("\r\n\r\n").next().unwrap_or_default();
    head.lines()
        .skip(1)
        .filter_map(|line| line.split_once(':'))
        .filter(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.trim())
        .collect()
}

fn app(identity: PodIdentity) -> Router {
    Router::new()
        .on(Method::GET, "/users/{id}", |req: Request| async move {
            format!("user {}", req.param("id").unwrap_or("unknown"))
        })
        .layer(HeaderEnrichment::new(identity))
}

#[tokio::test]
async fn responses_carry_diagnostic_headers() {
    let server = TestServer::start(app(PodIdentity::new(Some("10.1.2.3"), Some("pod-abc123")))).await;

    let raw = send(server.addr, "/users/42", &[("X-Forwarded-For", "203.0.113.5, 10.0.0.1")]).await;
    assert!(raw.starts_with("HTTP/1.1 200"), "{raw}");
    assert!(raw.ends_with("user 42"), "{raw}");
    assert_eq!(header_values(&raw, "AzRef-AppGwIp"), ["203.0.113.5"]);
    assert_eq!(header_values(&raw, "AzRef-NodeIp"), ["10.1.2.3"]);
    assert_eq!(header_values(&raw, "AzRef-PodName"), ["pod-abc123"]);

    server.shutdown().await;
}

#[tokio::test]
async fn missing_values_are_null_even_on_404() {
    let server = TestServer::start(app(PodIdentity::from_lookup(|_| None))).await;

    let raw = send(server.addr, "/nowhere", &[]).await;
    assert!(raw.starts_with("HTTP/1.1 404"), "{raw}");
    assert_eq!(header_values(&raw, "azref-appgwip"), ["null"]);
    assert_eq!(header_values(&raw, "azref-nodeip"), ["null"]);
    assert_eq!(header_values(&raw, "azref-podname"), ["null"]);

    server.shutdown().await;
}

#[tokio::test]
async fn chain_error_becomes_500() {
    let router = app(PodIdentity::default()).layer(middleware::from_fn(|_req, _next| async {
        Err::<Response, _>(Error::middleware("backend refused"))
    }));
    let server = TestServer::start(router).await;

    let raw = send(server.addr, "/users/42", &[]).await;
    assert!(raw.starts_with("HTTP/1.1 500"), "{raw}");
    assert!(header_values(&raw, "azref-podname").is_empty(), "{raw}");

    server.shutdown().await;
}

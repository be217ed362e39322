//! Shared utilities for integration tests.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    http::{header, StatusCode},
    routing::post,
    Router,
};
use image_relay::config::RelayConfig;
use image_relay::http::HttpServer;
use image_relay::lifecycle::Shutdown;
use serde_json::Value;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

/// A fake tile generator bound on an ephemeral port.
pub struct MockDownstream {
    pub addr: SocketAddr,
    calls: Arc<AtomicUsize>,
}

impl MockDownstream {
    pub fn endpoint(&self) -> String {
        format!("http://{}/generate_dzi", self.addr)
    }

    /// Number of requests the mock has received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Start a programmable downstream. `f` gets the parsed JSON body of each
/// call and returns the status and raw body to answer with.
pub async fn start_programmable_downstream<F, Fut>(f: F) -> MockDownstream
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));

    let f = Arc::new(f);
    let counter = calls.clone();
    let app = Router::new().route(
        "/generate_dzi",
        post(move |body: Bytes| {
            let f = f.clone();
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
                let (status, body) = f(json).await;
                (
                    StatusCode::from_u16(status).unwrap(),
                    [(header::CONTENT_TYPE, "application/json")],
                    body,
                )
            }
        }),
    );

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockDownstream { addr, calls }
}

/// Start a downstream that always answers with the same status and body.
pub async fn start_fixed_downstream(status: u16, body: &'static str) -> MockDownstream {
    start_programmable_downstream(move |_| async move { (status, body.to_string()) }).await
}

/// Start a backend that accepts connections and closes them without
/// answering.
pub async fn start_hangup_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let _ = socket.shutdown().await;
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// An address nothing is listening on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Start the relay on an ephemeral port pointed at `endpoint`.
pub async fn start_relay(endpoint: String) -> (SocketAddr, Shutdown) {
    let mut config = RelayConfig::default();
    config.downstream.endpoint = endpoint;
    start_relay_with(config).await
}

pub async fn start_relay_with(mut config: RelayConfig) -> (SocketAddr, Shutdown) {
    config.listener.host = "127.0.0.1".into();
    config.listener.port = 0;

    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind(server.config().listener.bind_address()).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

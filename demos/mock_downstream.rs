//! Stand-in for the tile generation service.
//!
//! Run with `cargo run --example mock_downstream`, then start the relay with
//! its default downstream endpoint.

use axum::{body::Bytes, http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;

async fn generate_dzi(body: Bytes) -> (StatusCode, Json<Value>) {
    let parsed: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let url = parsed.get("url").and_then(Value::as_str).map(str::trim);

    let Some(url) = url else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing 'url' in request body" })),
        );
    };

    let file = url.rsplit('/').next().unwrap_or(url);
    let stem = file.rsplit_once('.').map_or(file, |(stem, _)| stem);
    println!("Pretend tiling {}", url);

    (
        StatusCode::OK,
        Json(json!({
            "dzi_path": format!("data/processed_dzi/{}.dzi", stem),
            "metadata": {},
        })),
    )
}

#[tokio::main]
async fn main() {
    let app = Router::new().route("/generate_dzi", post(generate_dzi));

    let addr = SocketAddr::from(([127, 0, 0, 1], 5000));
    println!("Mock tile generator listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

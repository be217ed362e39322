//! Image relay library.
//!
//! ```text
//!     Client                ┌──────────────── IMAGE RELAY ────────────────┐
//!     ──── GET / ──────────▶│  liveness  → "<h1>Hello World</h1>"          │
//!                           │                                              │
//!     ──── POST /myimg ────▶│  validate url ──▶ DownstreamClient ──────────┼──▶ tile generator
//!     ◀─── 200/400/500 ─────│  passthrough / error body ◀──────────────────┼─── (POST /generate_dzi)
//!                           └──────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;

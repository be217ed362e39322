//! Image relay subsystem.
//!
//! # Data Flow
//! ```text
//! POST /myimg content type + body
//!     → types.rs (InboundRequest::parse, reject non-JSON or missing url)
//!     → client.rs (one POST to the downstream endpoint)
//!     → DownstreamPayload (opaque JSON bytes) or UpstreamError
//! ```
//!
//! # Design Decisions
//! - Validation happens before any network I/O
//! - The downstream body is checked to be JSON but never re-encoded
//! - Upstream failure causes are kept for logs, never sent to callers

pub mod client;
pub mod types;

pub use client::DownstreamClient;
pub use types::{
    is_json_content_type, ClientInitError, DownstreamPayload, InboundRequest, RelayError,
    UpstreamError,
};

//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum app, request ID / trace / timeout / body limit)
//!     → routing::Router::dispatch
//!     → response.rs (RouterError → status + message)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{query_params, request_path, MakeRequestUuid, X_REQUEST_ID};
pub use server::{AppState, HttpServer};

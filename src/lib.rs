//! Switchboard: a method + path router with tiered middleware.
//!
//! Routes are registered on a [`RouterBuilder`], frozen into an immutable
//! [`Router`], and dispatched synchronously: global middleware, then route
//! middleware, then the middleware of every enclosing group, then the
//! handler through a [`HandlerInvoker`](invoke::HandlerInvoker).

pub mod app;
pub mod config;
pub mod error;
pub mod http;
pub mod invoke;
pub mod lifecycle;
pub mod middleware;
pub mod observability;
pub mod routing;

pub use config::ServerConfig;
pub use error::RouterError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use middleware::{HttpMiddleware, MiddlewareSpec, Next};
pub use routing::{BoundArguments, HandlerSpec, Registrar, Router, RouterBuilder};

/// Request type seen by middleware and the router.
pub type Request = axum::http::Request<axum::body::Body>;

/// Response type threaded through middleware tiers.
pub type Response = axum::response::Response;

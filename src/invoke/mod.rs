//! Handler invocation.
//!
//! # Data Flow
//! ```text
//! Router::dispatch (all tiers passed)
//!     → bind_arguments(route.params, query)
//!     → HandlerInvoker::invoke(target, action, args)
//!         - Callable: called directly
//!         - Class: resolved to a controller, then `action` is called
//!     → Response returned verbatim
//! ```
//!
//! # Design Decisions
//! - The router only knows the [`HandlerInvoker`] trait
//! - [`ControllerRegistry`] is the bundled implementation: zero-argument
//!   factories keyed by class name, one fresh controller per call

pub mod controllers;

use crate::error::RouterError;
use crate::routing::{BoundArguments, HandlerTarget};
use crate::Response;

pub use controllers::{Controller, ControllerRegistry};

/// Performs the call a matched route describes.
pub trait HandlerInvoker: Send + Sync {
    fn invoke(
        &self,
        target: &HandlerTarget,
        action: Option<&str>,
        args: BoundArguments,
    ) -> Result<Response, RouterError>;
}

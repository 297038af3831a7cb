//! Middleware chains.
//!
//! # Data Flow
//! ```text
//! [m1, m2, ..., mn] + terminal pass-through
//!     → m1(request, response, next)
//!         → next.run(request, response) → m2(...)
//!             → ... → terminal returns the response unchanged
//! ```
//!
//! # Design Decisions
//! - A spec is either a closure or a class name resolved through
//!   [`MiddlewareRegistry`]; both run through [`MiddlewareSpec::execute`]
//! - Class names are resolved when their step runs, so a short-circuit
//!   earlier in the chain never touches them
//! - Chains borrow their specs and are rebuilt for every dispatch

pub mod registry;

use std::fmt;
use std::sync::Arc;

use crate::error::RouterError;
use crate::{Request, Response};

pub use registry::MiddlewareRegistry;

/// Middleware capability for class-reference specs.
pub trait HttpMiddleware: Send + Sync {
    /// Process the request. Call `next.run` to continue, or return a
    /// response to stop the chain here.
    fn execute(
        &self,
        request: &Request,
        response: Response,
        next: Next<'_>,
    ) -> Result<Response, RouterError>;
}

/// Closure form of a middleware.
pub type MiddlewareFn =
    dyn Fn(&Request, Response, Next<'_>) -> Result<Response, RouterError> + Send + Sync;

/// One entry in a middleware tier.
#[derive(Clone)]
pub enum MiddlewareSpec {
    Callable(Arc<MiddlewareFn>),
    Class(String),
}

impl MiddlewareSpec {
    pub fn callable<F>(f: F) -> Self
    where
        F: Fn(&Request, Response, Next<'_>) -> Result<Response, RouterError> + Send + Sync + 'static,
    {
        MiddlewareSpec::Callable(Arc::new(f))
    }

    pub fn class(name: impl Into<String>) -> Self {
        MiddlewareSpec::Class(name.into())
    }

    /// Run this step with `next` as its continuation.
    pub fn execute(
        &self,
        request: &Request,
        response: Response,
        next: Next<'_>,
    ) -> Result<Response, RouterError> {
        match self {
            MiddlewareSpec::Callable(f) => f(request, response, next),
            MiddlewareSpec::Class(name) => {
                let instance = next.registry.resolve(name)?;
                instance.execute(request, response, next)
            }
        }
    }
}

impl fmt::Debug for MiddlewareSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MiddlewareSpec::Callable(_) => f.write_str("Callable(..)"),
            MiddlewareSpec::Class(name) => f.debug_tuple("Class").field(name).finish(),
        }
    }
}

impl From<&str> for MiddlewareSpec {
    fn from(name: &str) -> Self {
        MiddlewareSpec::class(name)
    }
}

impl From<String> for MiddlewareSpec {
    fn from(name: String) -> Self {
        MiddlewareSpec::Class(name)
    }
}

/// Continuation handed to each middleware: the rest of the chain.
pub struct Next<'a> {
    remaining: &'a [MiddlewareSpec],
    registry: &'a MiddlewareRegistry,
}

impl<'a> Next<'a> {
    /// Run the remaining middleware. The terminal step returns `response`
    /// unchanged.
    pub fn run(self, request: &Request, response: Response) -> Result<Response, RouterError> {
        match self.remaining.split_first() {
            None => Ok(response),
            Some((head, rest)) => {
                let next = Next {
                    remaining: rest,
                    registry: self.registry,
                };
                head.execute(request, response, next)
            }
        }
    }
}

/// A composed tier: `specs[0]` runs outermost.
pub struct MiddlewareChain<'a> {
    specs: &'a [MiddlewareSpec],
    registry: &'a MiddlewareRegistry,
}

impl<'a> MiddlewareChain<'a> {
    pub fn new(specs: &'a [MiddlewareSpec], registry: &'a MiddlewareRegistry) -> Self {
        Self { specs, registry }
    }

    pub fn handle(&self, request: &Request, response: Response) -> Result<Response, RouterError> {
        Next {
            remaining: self.specs,
            registry: self.registry,
        }
        .run(request, response)
    }
}

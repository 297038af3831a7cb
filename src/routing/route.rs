//! Route records and handler references.

use std::fmt;
use std::sync::Arc;

use crate::error::RouterError;
use crate::middleware::MiddlewareSpec;
use crate::routing::params::{BoundArguments, RouteParameter};
use crate::Response;

/// Closure form of a handler.
pub type CallableHandler =
    Arc<dyn Fn(BoundArguments) -> Result<Response, RouterError> + Send + Sync>;

/// A handler as given at registration.
#[derive(Clone)]
pub enum HandlerSpec {
    Callable(CallableHandler),
    /// `"Class::action"`
    Reference(String),
}

impl HandlerSpec {
    pub fn callable<F>(f: F) -> Self
    where
        F: Fn(BoundArguments) -> Result<Response, RouterError> + Send + Sync + 'static,
    {
        HandlerSpec::Callable(Arc::new(f))
    }

    /// Split into what the route stores. Callables never carry an action.
    pub(crate) fn resolve(self) -> Result<(HandlerTarget, Option<String>), RouterError> {
        match self {
            HandlerSpec::Callable(f) => Ok((HandlerTarget::Callable(f), None)),
            HandlerSpec::Reference(reference) => {
                let mut parts = reference.split("::");
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(class), Some(action), None) if !class.is_empty() && !action.is_empty() => {
                        Ok((HandlerTarget::Class(class.to_string()), Some(action.to_string())))
                    }
                    _ => Err(RouterError::InvalidHandlerFormat(reference)),
                }
            }
        }
    }
}

impl From<&str> for HandlerSpec {
    fn from(reference: &str) -> Self {
        HandlerSpec::Reference(reference.to_string())
    }
}

impl From<String> for HandlerSpec {
    fn from(reference: String) -> Self {
        HandlerSpec::Reference(reference)
    }
}

impl fmt::Debug for HandlerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerSpec::Callable(_) => f.write_str("Callable(..)"),
            HandlerSpec::Reference(r) => f.debug_tuple("Reference").field(r).finish(),
        }
    }
}

/// What the invoker is asked to call.
#[derive(Clone)]
pub enum HandlerTarget {
    Callable(CallableHandler),
    Class(String),
}

impl HandlerTarget {
    /// Class name, or `None` for callables.
    pub fn class(&self) -> Option<&str> {
        match self {
            HandlerTarget::Callable(_) => None,
            HandlerTarget::Class(name) => Some(name),
        }
    }
}

impl fmt::Display for HandlerTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerTarget::Callable(_) => f.write_str("<closure>"),
            HandlerTarget::Class(name) => f.write_str(name),
        }
    }
}

impl fmt::Debug for HandlerTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerTarget::Callable(_) => f.write_str("Callable(..)"),
            HandlerTarget::Class(name) => f.debug_tuple("Class").field(name).finish(),
        }
    }
}

/// A registered route. Immutable once built.
#[derive(Debug, Clone)]
pub struct Route {
    method: String,
    path: String,
    target: HandlerTarget,
    action: Option<String>,
    params: Vec<RouteParameter>,
    middleware: Vec<MiddlewareSpec>,
    group_stack: Vec<String>,
}

impl Route {
    pub(crate) fn new(
        method: String,
        path: String,
        handler: HandlerSpec,
        params: Vec<RouteParameter>,
        middleware: Vec<MiddlewareSpec>,
        group_stack: Vec<String>,
    ) -> Result<Self, RouterError> {
        let (target, action) = handler.resolve()?;
        Ok(Self {
            method,
            path,
            target,
            action,
            params,
            middleware,
            group_stack,
        })
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Path after group prefixes were applied.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn target(&self) -> &HandlerTarget {
        &self.target
    }

    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    pub fn params(&self) -> &[RouteParameter] {
        &self.params
    }

    pub fn middleware(&self) -> &[MiddlewareSpec] {
        &self.middleware
    }

    /// Group prefixes active at registration, outermost first.
    pub fn group_stack(&self) -> &[String] {
        &self.group_stack
    }
}

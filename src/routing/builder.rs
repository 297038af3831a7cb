//! Route registration.
//!
//! # Responsibilities
//! - Turn `(method, pattern, handler, middleware)` into [`Route`] records
//! - Apply group prefixes and remember which groups a route sits in
//! - Collect global and per-group middleware
//! - Freeze everything into an immutable [`Router`]
//!
//! # Design Decisions
//! - The active group stack lives in each [`Group`] scope, never on the
//!   builder, so a route's `group_stack` is a snapshot by construction
//! - Group middleware is recorded after the group callback returns and is
//!   looked up at dispatch time
//! - Duplicate `(method, path)` registrations keep the first route

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::RouterError;
use crate::http::request::split_target;
use crate::invoke::HandlerInvoker;
use crate::middleware::{MiddlewareRegistry, MiddlewareSpec};
use crate::routing::params::parse_params;
use crate::routing::route::{HandlerSpec, Route};
use crate::routing::router::Router;
use crate::routing::table::RouteTable;

/// Registration surface shared by [`RouterBuilder`] and [`Group`].
pub trait Registrar {
    /// Register a route for `method`. Placeholders in `pattern` become the
    /// route's parameters.
    fn add<H>(
        &mut self,
        method: &str,
        pattern: &str,
        handler: H,
        middleware: Vec<MiddlewareSpec>,
    ) -> Result<(), RouterError>
    where
        H: Into<HandlerSpec>;

    /// Register routes under `prefix`. `middleware` applies to every route
    /// registered inside `callback`, including nested groups.
    fn group<F>(
        &mut self,
        prefix: &str,
        middleware: Vec<MiddlewareSpec>,
        callback: F,
    ) -> Result<(), RouterError>
    where
        F: FnOnce(&mut Group<'_>) -> Result<(), RouterError>;

    fn get<H: Into<HandlerSpec>>(&mut self, pattern: &str, handler: H) -> Result<(), RouterError> {
        self.add("GET", pattern, handler, Vec::new())
    }

    fn post<H: Into<HandlerSpec>>(&mut self, pattern: &str, handler: H) -> Result<(), RouterError> {
        self.add("POST", pattern, handler, Vec::new())
    }

    fn put<H: Into<HandlerSpec>>(&mut self, pattern: &str, handler: H) -> Result<(), RouterError> {
        self.add("PUT", pattern, handler, Vec::new())
    }

    fn patch<H: Into<HandlerSpec>>(&mut self, pattern: &str, handler: H) -> Result<(), RouterError> {
        self.add("PATCH", pattern, handler, Vec::new())
    }

    fn delete<H: Into<HandlerSpec>>(&mut self, pattern: &str, handler: H) -> Result<(), RouterError> {
        self.add("DELETE", pattern, handler, Vec::new())
    }
}

/// Mutable registration state; call [`RouterBuilder::build`] to freeze it.
#[derive(Debug, Default)]
pub struct RouterBuilder {
    table: RouteTable,
    middleware: Vec<MiddlewareSpec>,
    group_middleware: HashMap<String, Vec<MiddlewareSpec>>,
    registry: MiddlewareRegistry,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one global middleware.
    pub fn add_middleware(&mut self, spec: impl Into<MiddlewareSpec>) -> &mut Self {
        self.middleware.push(spec.into());
        self
    }

    /// Append several global middleware, preserving their order.
    pub fn add_middlewares<I>(&mut self, specs: I) -> &mut Self
    where
        I: IntoIterator<Item = MiddlewareSpec>,
    {
        self.middleware.extend(specs);
        self
    }

    /// Where class-reference middleware names are registered.
    pub fn registry_mut(&mut self) -> &mut MiddlewareRegistry {
        &mut self.registry
    }

    /// Freeze the registrations.
    pub fn build(self, invoker: Arc<dyn HandlerInvoker>) -> Router {
        tracing::debug!(
            routes = self.table.len(),
            global_middleware = self.middleware.len(),
            groups = self.group_middleware.len(),
            "Route table frozen"
        );
        Router::new(
            self.table,
            self.middleware,
            self.group_middleware,
            self.registry,
            invoker,
        )
    }

    fn register(
        &mut self,
        stack: &[String],
        method: &str,
        pattern: &str,
        handler: HandlerSpec,
        middleware: Vec<MiddlewareSpec>,
    ) -> Result<(), RouterError> {
        let method = method.to_ascii_uppercase();
        let path = expand_path(stack, pattern);
        let route = Route::new(
            method,
            path,
            handler,
            parse_params(pattern),
            middleware,
            stack.to_vec(),
        )?;

        let (method, path, target) = (
            route.method().to_string(),
            route.path().to_string(),
            route.target().to_string(),
        );
        if self.table.insert(route) {
            tracing::debug!(method = %method, path = %path, handler = %target, "Route registered");
        } else {
            tracing::warn!(
                method = %method,
                path = %path,
                "Duplicate route ignored, first registration wins"
            );
        }
        Ok(())
    }

    fn open_group<F>(
        &mut self,
        mut stack: Vec<String>,
        prefix: &str,
        middleware: Vec<MiddlewareSpec>,
        callback: F,
    ) -> Result<(), RouterError>
    where
        F: FnOnce(&mut Group<'_>) -> Result<(), RouterError>,
    {
        stack.push(prefix.to_string());
        let result = callback(&mut Group {
            builder: self,
            stack,
        });

        // Routes added before a failing callback stay in the table and
        // must still run behind the group's middleware.
        if self
            .group_middleware
            .insert(prefix.to_string(), middleware)
            .is_some()
        {
            tracing::warn!(group = %prefix, "Group middleware replaced");
        }
        result
    }
}

impl Registrar for RouterBuilder {
    fn add<H>(
        &mut self,
        method: &str,
        pattern: &str,
        handler: H,
        middleware: Vec<MiddlewareSpec>,
    ) -> Result<(), RouterError>
    where
        H: Into<HandlerSpec>,
    {
        self.register(&[], method, pattern, handler.into(), middleware)
    }

    fn group<F>(
        &mut self,
        prefix: &str,
        middleware: Vec<MiddlewareSpec>,
        callback: F,
    ) -> Result<(), RouterError>
    where
        F: FnOnce(&mut Group<'_>) -> Result<(), RouterError>,
    {
        self.open_group(Vec::new(), prefix, middleware, callback)
    }
}

/// Registration scope inside a group callback.
pub struct Group<'a> {
    builder: &'a mut RouterBuilder,
    stack: Vec<String>,
}

impl Group<'_> {
    /// Prefixes of this scope, outermost first.
    pub fn prefixes(&self) -> &[String] {
        &self.stack
    }
}

impl Registrar for Group<'_> {
    fn add<H>(
        &mut self,
        method: &str,
        pattern: &str,
        handler: H,
        middleware: Vec<MiddlewareSpec>,
    ) -> Result<(), RouterError>
    where
        H: Into<HandlerSpec>,
    {
        self.builder
            .register(&self.stack, method, pattern, handler.into(), middleware)
    }

    fn group<F>(
        &mut self,
        prefix: &str,
        middleware: Vec<MiddlewareSpec>,
        callback: F,
    ) -> Result<(), RouterError>
    where
        F: FnOnce(&mut Group<'_>) -> Result<(), RouterError>,
    {
        self.builder
            .open_group(self.stack.clone(), prefix, middleware, callback)
    }
}

/// Path component of `pattern`, under `/`-joined group prefixes.
fn expand_path(stack: &[String], pattern: &str) -> String {
    let (path, _) = split_target(pattern);

    if stack.is_empty() {
        return path.to_string();
    }

    let prefix = stack
        .iter()
        .map(|p| p.trim_matches('/'))
        .collect::<Vec<_>>()
        .join("/");
    format!("/{prefix}{path}")
}

//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Hold the frozen route table and middleware tiers
//! - Look up the route for a request's method and path
//! - Run the global, route and group tiers in that order
//! - Bind arguments and hand the call to the invoker
//!
//! # Design Decisions
//! - Immutable after construction (shared via `Arc`, no locks)
//! - Exact path equality; placeholders feed argument binding only
//! - A tier leaving a non-200 status ends dispatch with that response
//! - Explicit `RouteNotFound` rather than a silent default

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use axum::http::StatusCode;
use serde::Serialize;

use crate::error::RouterError;
use crate::http::request::{query_params, request_path};
use crate::invoke::HandlerInvoker;
use crate::middleware::{MiddlewareChain, MiddlewareRegistry, MiddlewareSpec};
use crate::observability::metrics;
use crate::routing::params::{bind_arguments, RouteParameter};
use crate::routing::route::Route;
use crate::routing::table::RouteTable;
use crate::{Request, Response};

/// The frozen router.
pub struct Router {
    table: RouteTable,
    middleware: Vec<MiddlewareSpec>,
    group_middleware: HashMap<String, Vec<MiddlewareSpec>>,
    registry: MiddlewareRegistry,
    invoker: Arc<dyn HandlerInvoker>,
}

impl Router {
    pub(crate) fn new(
        table: RouteTable,
        middleware: Vec<MiddlewareSpec>,
        group_middleware: HashMap<String, Vec<MiddlewareSpec>>,
        registry: MiddlewareRegistry,
        invoker: Arc<dyn HandlerInvoker>,
    ) -> Self {
        Self {
            table,
            middleware,
            group_middleware,
            registry,
            invoker,
        }
    }

    /// Route registered for `(method, path)`, if any.
    pub fn find(&self, method: &str, path: &str) -> Option<&Route> {
        self.table.find(method, path)
    }

    /// Dispatch a request through the middleware tiers to its handler.
    pub fn dispatch(&self, request: &Request) -> Result<Response, RouterError> {
        let start = Instant::now();
        let method = request.method().as_str().to_string();
        let result = self.dispatch_inner(request);

        let status = match &result {
            Ok(response) => response.status(),
            Err(err) => err.status_code(),
        };
        metrics::record_dispatch(&method, status.as_u16(), start);
        result
    }

    fn dispatch_inner(&self, request: &Request) -> Result<Response, RouterError> {
        let method = request.method().as_str();
        let path = request_path(request);

        let route = self
            .table
            .find(method, path)
            .ok_or_else(|| RouterError::RouteNotFound {
                method: method.to_string(),
                path: path.to_string(),
            })?;

        tracing::debug!(method = %method, path = %path, handler = %route.target(), "Dispatching");

        let mut response = Response::default();

        response = self.run_tier(&self.middleware, request, response)?;
        if halted(&response) {
            tracing::info!(path = %path, status = %response.status(), tier = "global", "Dispatch short-circuited");
            return Ok(response);
        }

        response = self.run_tier(route.middleware(), request, response)?;
        if halted(&response) {
            tracing::info!(path = %path, status = %response.status(), tier = "route", "Dispatch short-circuited");
            return Ok(response);
        }

        for group in route.group_stack() {
            let specs = self
                .group_middleware
                .get(group)
                .ok_or_else(|| RouterError::InvalidMiddlewareTarget(format!("group {group}")))?;
            response = self.run_tier(specs, request, response)?;
            if halted(&response) {
                tracing::info!(path = %path, status = %response.status(), tier = "group", group = %group, "Dispatch short-circuited");
                return Ok(response);
            }
        }

        let args = bind_arguments(route.params(), &query_params(request))?;
        self.invoker.invoke(route.target(), route.action(), args)
    }

    fn run_tier(
        &self,
        specs: &[MiddlewareSpec],
        request: &Request,
        response: Response,
    ) -> Result<Response, RouterError> {
        MiddlewareChain::new(specs, &self.registry).handle(request, response)
    }

    /// Snapshot of the route table in registration order.
    pub fn routes(&self) -> Vec<RouteInfo> {
        self.table.iter().map(RouteInfo::from).collect()
    }
}

fn halted(response: &Response) -> bool {
    response.status() != StatusCode::OK
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.table.len())
            .field("global_middleware", &self.middleware.len())
            .field("groups", &self.group_middleware.len())
            .field("registry", &self.registry)
            .finish()
    }
}

/// Serializable description of a registered route.
#[derive(Debug, Clone, Serialize)]
pub struct RouteInfo {
    pub method: String,
    pub path: String,
    pub handler: String,
    pub action: Option<String>,
    pub params: Vec<RouteParameter>,
    pub middleware: Vec<String>,
    pub groups: Vec<String>,
}

impl From<&Route> for RouteInfo {
    fn from(route: &Route) -> Self {
        Self {
            method: route.method().to_string(),
            path: route.path().to_string(),
            handler: route.target().to_string(),
            action: route.action().map(str::to_string),
            params: route.params().to_vec(),
            middleware: route
                .middleware()
                .iter()
                .map(|m| match m {
                    MiddlewareSpec::Callable(_) => "<closure>".to_string(),
                    MiddlewareSpec::Class(name) => name.clone(),
                })
                .collect(),
            groups: route.group_stack().to_vec(),
        }
    }
}

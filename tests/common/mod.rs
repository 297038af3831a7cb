//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::StatusCode;
use switchboard::invoke::HandlerInvoker;
use switchboard::routing::{BoundArguments, HandlerTarget};
use switchboard::{MiddlewareSpec, Request, Response, RouterError};

/// One call observed by [`RecordingInvoker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    /// Class name, or `None` for closures.
    pub target: Option<String>,
    pub action: Option<String>,
    pub args: Vec<String>,
}

/// Invoker that records every call and answers 200 "handled".
/// Closure targets are still executed so their output can be checked.
#[derive(Clone, Default)]
pub struct RecordingInvoker {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl RecordingInvoker {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl HandlerInvoker for RecordingInvoker {
    fn invoke(
        &self,
        target: &HandlerTarget,
        action: Option<&str>,
        args: BoundArguments,
    ) -> Result<Response, RouterError> {
        self.calls.lock().unwrap().push(Call {
            target: target.class().map(str::to_string),
            action: action.map(str::to_string),
            args: args.positional().into_iter().map(str::to_string).collect(),
        });
        match target {
            HandlerTarget::Callable(f) => f(args),
            HandlerTarget::Class(_) => Ok(Response::new(Body::from("handled"))),
        }
    }
}

/// Shared, ordered log of middleware events.
pub type EventLog = Arc<Mutex<Vec<String>>>;

pub fn event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn events(log: &EventLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Middleware that logs `name` and continues.
pub fn recorder(log: &EventLog, name: &'static str) -> MiddlewareSpec {
    let log = log.clone();
    MiddlewareSpec::callable(move |req, res, next| {
        log.lock().unwrap().push(name.to_string());
        next.run(req, res)
    })
}

/// Middleware that logs `name` and stops the chain with `status`.
pub fn blocker(log: &EventLog, name: &'static str, status: StatusCode) -> MiddlewareSpec {
    let log = log.clone();
    MiddlewareSpec::callable(move |_req, mut res, _next| {
        log.lock().unwrap().push(name.to_string());
        *res.status_mut() = status;
        Ok(res)
    })
}

pub fn request(method: &str, uri: &str) -> Request {
    axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

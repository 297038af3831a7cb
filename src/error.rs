//! Error taxonomy for registration and dispatch.
//!
//! Nothing in the routing core catches these; they propagate to the HTTP
//! entry point, which renders them through [`RouterError::status_code`].

use axum::http::StatusCode;

/// Boxed error returned by handlers and controllers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while registering routes or dispatching a request.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// No route is registered for the method and path.
    #[error("no route for {method} {path}")]
    RouteNotFound { method: String, path: String },

    /// A string handler reference is not of the form `Class::action`.
    #[error("invalid handler reference `{0}`, expected `Class::action`")]
    InvalidHandlerFormat(String),

    /// A class-reference middleware does not resolve to a middleware.
    #[error("`{0}` does not resolve to a middleware")]
    InvalidMiddlewareTarget(String),

    /// A required route parameter is absent from the query string.
    #[error("missing required argument: {0}")]
    MissingRequiredArgument(String),

    /// The invoker has no controller registered under this class name.
    #[error("no controller registered for `{0}`")]
    UnresolvedHandler(String),

    /// The controller exists but does not expose the action.
    #[error("controller `{target}` has no action `{action}`")]
    UnknownAction { target: String, action: String },

    /// The handler itself failed.
    #[error("handler `{target}` failed: {source}")]
    Handler {
        target: String,
        #[source]
        source: BoxError,
    },
}

impl RouterError {
    /// Wrap a handler failure.
    pub fn handler(target: impl Into<String>, source: impl Into<BoxError>) -> Self {
        RouterError::Handler {
            target: target.into(),
            source: source.into(),
        }
    }

    /// HTTP status the front end answers with for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RouterError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            RouterError::MissingRequiredArgument(_) => StatusCode::BAD_REQUEST,
            RouterError::UnknownAction { .. } => StatusCode::NOT_FOUND,
            RouterError::InvalidHandlerFormat(_)
            | RouterError::InvalidMiddlewareTarget(_)
            | RouterError::UnresolvedHandler(_)
            | RouterError::Handler { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

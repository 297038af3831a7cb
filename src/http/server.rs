//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the axum app that forwards every request to the router
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Bind server to listener
//! - Stop on the shutdown broadcast or an OS signal

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderName, Request},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::lifecycle::signals::shutdown_signal;
use crate::routing::Router as DispatchRouter;

/// Application state injected into the fallback handler.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<DispatchRouter>,
}

/// HTTP front end for a frozen [`DispatchRouter`].
pub struct HttpServer {
    app: Router,
}

impl HttpServer {
    pub fn new(config: ServerConfig, router: Arc<DispatchRouter>) -> Self {
        let app = Self::build_app(&config, AppState { router });
        Self { app }
    }

    /// Build the axum app with all middleware layers.
    #[allow(deprecated)]
    fn build_app(config: &ServerConfig, state: AppState) -> Router {
        let request_id = HeaderName::from_static(X_REQUEST_ID);

        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::new(request_id.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
    }

    /// The axum app, for driving requests without a socket.
    pub fn app(&self) -> Router {
        self.app.clone()
    }

    /// Serve until `shutdown` fires or the process is signalled.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown.recv() => tracing::info!("Shutdown requested"),
                    _ = shutdown_signal() => {}
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Hands every request to the router.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    match state.router.dispatch(&request) {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

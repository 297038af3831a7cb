//! Bundled application served by the binary.
//!
//! ```text
//! GET  /health                      closure
//! GET  /users/{id}                  UserController::show
//! GET  /users/{page=1}              UserController::index (path "/users/{page=1}")
//! POST /api/users/{name}            UserController::store    [ApiKeyMiddleware]
//! DELETE /api/users/{id}            UserController::destroy  [ApiKeyMiddleware]
//! ```
//!
//! Lookup compares the raw request path with the registered pattern, braces
//! included. Clients that percent-encode them (`/users/%7Bid%7D`, as browsers
//! and the `url` crate do) get a 404; send the literal path, e.g.
//! `curl --globoff 'http://localhost:8080/users/{id}?id=5'`.

use std::sync::Arc;

use axum::http::{HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::error::RouterError;
use crate::invoke::{Controller, ControllerRegistry};
use crate::middleware::{HttpMiddleware, MiddlewareSpec, Next};
use crate::routing::{BoundArguments, HandlerSpec, Registrar, Router, RouterBuilder};
use crate::{Request, Response};

/// Header checked by [`ApiKeyMiddleware`].
pub const API_KEY_HEADER: &str = "x-api-key";

/// Register the bundled routes and freeze them.
pub fn build_router(api_key: &str) -> Result<Router, RouterError> {
    let mut builder = RouterBuilder::new();

    let key = api_key.to_string();
    builder
        .registry_mut()
        .register_with("ApiKeyMiddleware", move || {
            Box::new(ApiKeyMiddleware { key: key.clone() }) as Box<dyn HttpMiddleware>
        });

    builder.add_middleware(MiddlewareSpec::callable(|req, res, next| {
        tracing::debug!(method = %req.method(), uri = %req.uri(), "Request received");
        next.run(req, res)
    }));

    builder.get(
        "/health",
        HandlerSpec::callable(|_| Ok(Json(json!({ "status": "ok" })).into_response())),
    )?;
    builder.get("/users/{id}", "UserController::show")?;
    builder.get("/users/{page=1}", "UserController::index")?;

    builder.group("api", vec![MiddlewareSpec::class("ApiKeyMiddleware")], |api| {
        api.post("/users/{name}", "UserController::store")?;
        api.delete("/users/{id}", "UserController::destroy")
    })?;

    let mut controllers = ControllerRegistry::new();
    controllers.register::<UserController>("UserController");

    Ok(builder.build(Arc::new(controllers)))
}

/// Rejects requests whose `x-api-key` header does not match.
pub struct ApiKeyMiddleware {
    key: String,
}

impl HttpMiddleware for ApiKeyMiddleware {
    fn execute(
        &self,
        request: &Request,
        mut response: Response,
        next: Next<'_>,
    ) -> Result<Response, RouterError> {
        let presented = request
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok());

        if presented == Some(self.key.as_str()) {
            return next.run(request, response);
        }

        tracing::warn!(uri = %request.uri(), "Rejected request without a valid API key");
        *response.status_mut() = StatusCode::UNAUTHORIZED;
        response
            .headers_mut()
            .insert("www-authenticate", HeaderValue::from_static("ApiKey"));
        Ok(response)
    }
}

/// Example controller for the `/users` routes.
#[derive(Default)]
pub struct UserController;

impl Controller for UserController {
    fn call(&self, action: &str, args: BoundArguments) -> Result<Response, RouterError> {
        match action {
            "show" => Ok(Json(json!({ "id": args.get("id") })).into_response()),
            "index" => {
                let page: u32 = args
                    .get("page")
                    .unwrap_or("1")
                    .parse()
                    .map_err(|e| RouterError::handler("UserController", e))?;
                Ok(Json(json!({ "page": page, "users": [] })).into_response())
            }
            "store" => Ok((
                StatusCode::CREATED,
                Json(json!({ "name": args.get("name") })),
            )
                .into_response()),
            "destroy" => Ok(StatusCode::NO_CONTENT.into_response()),
            other => Err(RouterError::UnknownAction {
                target: "UserController".to_string(),
                action: other.to_string(),
            }),
        }
    }
}

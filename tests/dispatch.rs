//! Dispatch behaviour: lookup, middleware tiers, argument binding.

use std::sync::Arc;

use axum::http::StatusCode;
use switchboard::{HandlerSpec, Registrar, RouterBuilder, RouterError};

mod common;
use common::{blocker, event_log, events, recorder, request, Call, RecordingInvoker};

#[test]
fn test_class_reference_round_trip() {
    let mut builder = RouterBuilder::new();
    builder.get("/users/{id}", "UserController::show").unwrap();
    let invoker = RecordingInvoker::default();
    let router = builder.build(Arc::new(invoker.clone()));

    let res = router.dispatch(&request("GET", "/users/{id}?id=5")).unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        invoker.calls(),
        vec![Call {
            target: Some("UserController".into()),
            action: Some("show".into()),
            args: vec!["5".into()],
        }]
    );
}

#[test]
fn test_every_registered_pair_reaches_its_handler() {
    let mut builder = RouterBuilder::new();
    builder.get("/posts", "PostController::index").unwrap();
    builder.post("/posts", "PostController::store").unwrap();
    builder.put("/posts", "PostController::replace").unwrap();
    builder.patch("/posts", "PostController::update").unwrap();
    builder.delete("/posts", "PostController::destroy").unwrap();
    builder.add("options", "/posts", "PostController::options", vec![]).unwrap();
    let invoker = RecordingInvoker::default();
    let router = builder.build(Arc::new(invoker.clone()));

    for method in ["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"] {
        router.dispatch(&request(method, "/posts")).unwrap();
    }

    let actions: Vec<_> = invoker
        .calls()
        .into_iter()
        .map(|c| c.action.unwrap())
        .collect();
    assert_eq!(
        actions,
        vec!["index", "store", "replace", "update", "destroy", "options"]
    );
}

#[test]
fn test_callable_handler_has_no_action() {
    let mut builder = RouterBuilder::new();
    builder
        .get(
            "/ping",
            HandlerSpec::callable(|_| Ok(switchboard::Response::default())),
        )
        .unwrap();
    let invoker = RecordingInvoker::default();
    let router = builder.build(Arc::new(invoker.clone()));

    router.dispatch(&request("GET", "/ping")).unwrap();

    let calls = invoker.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].target, None);
    assert_eq!(calls[0].action, None);
}

#[test]
fn test_unknown_route_and_wrong_method() {
    let mut builder = RouterBuilder::new();
    builder.get("/users", "UserController::index").unwrap();
    let router = builder.build(Arc::new(RecordingInvoker::default()));

    let err = router.dispatch(&request("GET", "/missing")).unwrap_err();
    assert!(matches!(
        &err,
        RouterError::RouteNotFound { method, path } if method == "GET" && path == "/missing"
    ));
    assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

    let err = router.dispatch(&request("POST", "/users")).unwrap_err();
    assert!(matches!(err, RouterError::RouteNotFound { .. }));
}

#[test]
fn test_invalid_handler_format_aborts_registration() {
    let mut builder = RouterBuilder::new();
    let err = builder.get("/x", "JustAClass").unwrap_err();
    assert!(matches!(err, RouterError::InvalidHandlerFormat(r) if r == "JustAClass"));

    let router = builder.build(Arc::new(RecordingInvoker::default()));
    assert!(router.routes().is_empty());
}

#[test]
fn test_nested_group_prefixes() {
    let mut builder = RouterBuilder::new();
    builder
        .group("api", vec![], |api| {
            api.group("v1", vec![], |v1| v1.get("/users", "UserController::index"))
        })
        .unwrap();
    let router = builder.build(Arc::new(RecordingInvoker::default()));

    assert!(router.find("GET", "/api/v1/users").is_some());
    assert!(router.dispatch(&request("GET", "/api/v1/users")).is_ok());
    assert!(router.dispatch(&request("GET", "/users")).is_err());
}

#[test]
fn test_tier_order_global_route_group() {
    let log = event_log();
    let mut builder = RouterBuilder::new();
    builder.add_middleware(recorder(&log, "global-1"));
    builder.add_middlewares(vec![recorder(&log, "global-2"), recorder(&log, "global-3")]);
    builder
        .group("outer", vec![recorder(&log, "group-outer")], |outer| {
            outer.group("inner", vec![recorder(&log, "group-inner")], |inner| {
                inner.add(
                    "GET",
                    "/thing",
                    "ThingController::show",
                    vec![recorder(&log, "route-1"), recorder(&log, "route-2")],
                )
            })
        })
        .unwrap();
    let router = builder.build(Arc::new(RecordingInvoker::default()));

    router.dispatch(&request("GET", "/outer/inner/thing")).unwrap();

    assert_eq!(
        events(&log),
        vec![
            "global-1",
            "global-2",
            "global-3",
            "route-1",
            "route-2",
            "group-outer",
            "group-inner",
        ]
    );
}

#[test]
fn test_tiers_observe_prior_response() {
    let mut builder = RouterBuilder::new();
    builder.add_middleware(switchboard::MiddlewareSpec::callable(|req, mut res, next| {
        res.headers_mut().insert("x-seen", "global".parse().unwrap());
        next.run(req, res)
    }));
    builder
        .add(
            "GET",
            "/check",
            "CheckController::run",
            vec![switchboard::MiddlewareSpec::callable(|req, mut res, next| {
                if res.headers().get("x-seen").is_none() {
                    *res.status_mut() = StatusCode::EXPECTATION_FAILED;
                    return Ok(res);
                }
                next.run(req, res)
            })],
        )
        .unwrap();
    let invoker = RecordingInvoker::default();
    let router = builder.build(Arc::new(invoker.clone()));

    let res = router.dispatch(&request("GET", "/check")).unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(invoker.calls().len(), 1);
}

#[test]
fn test_global_403_halts_everything() {
    let log = event_log();
    let mut builder = RouterBuilder::new();
    builder.add_middleware(blocker(&log, "global", StatusCode::FORBIDDEN));
    builder
        .group("g", vec![recorder(&log, "group")], |g| {
            g.add("GET", "/secret", "SecretController::show", vec![recorder(&log, "route")])
        })
        .unwrap();
    let invoker = RecordingInvoker::default();
    let router = builder.build(Arc::new(invoker.clone()));

    let res = router.dispatch(&request("GET", "/g/secret")).unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(events(&log), vec!["global"]);
    assert!(invoker.calls().is_empty());
}

#[test]
fn test_route_tier_halt_skips_groups() {
    let log = event_log();
    let mut builder = RouterBuilder::new();
    builder.add_middleware(recorder(&log, "global"));
    builder
        .group("g", vec![recorder(&log, "group")], |g| {
            g.add(
                "GET",
                "/x",
                "X::y",
                vec![blocker(&log, "route", StatusCode::UNAUTHORIZED)],
            )
        })
        .unwrap();
    let invoker = RecordingInvoker::default();
    let router = builder.build(Arc::new(invoker.clone()));

    let res = router.dispatch(&request("GET", "/g/x")).unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(events(&log), vec!["global", "route"]);
    assert!(invoker.calls().is_empty());
}

#[test]
fn test_outer_group_halt_skips_inner_group() {
    let log = event_log();
    let mut builder = RouterBuilder::new();
    builder
        .group("a", vec![blocker(&log, "a", StatusCode::TOO_MANY_REQUESTS)], |a| {
            a.group("b", vec![recorder(&log, "b")], |b| b.get("/c", "C::d"))
        })
        .unwrap();
    let invoker = RecordingInvoker::default();
    let router = builder.build(Arc::new(invoker.clone()));

    let res = router.dispatch(&request("GET", "/a/b/c")).unwrap();

    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(events(&log), vec!["a"]);
    assert!(invoker.calls().is_empty());
}

#[test]
fn test_group_middleware_not_applied_outside_group() {
    let log = event_log();
    let mut builder = RouterBuilder::new();
    builder
        .group("admin", vec![recorder(&log, "admin")], |admin| {
            admin.get("/panel", "Admin::panel")
        })
        .unwrap();
    builder.get("/public", "Public::index").unwrap();
    let router = builder.build(Arc::new(RecordingInvoker::default()));

    router.dispatch(&request("GET", "/public")).unwrap();
    assert!(events(&log).is_empty());

    router.dispatch(&request("GET", "/admin/panel")).unwrap();
    assert_eq!(events(&log), vec!["admin"]);
}

#[test]
fn test_missing_required_argument() {
    let mut builder = RouterBuilder::new();
    builder.get("/users/{id}", "UserController::show").unwrap();
    let invoker = RecordingInvoker::default();
    let router = builder.build(Arc::new(invoker.clone()));

    let err = router.dispatch(&request("GET", "/users/{id}")).unwrap_err();
    assert!(matches!(&err, RouterError::MissingRequiredArgument(name) if name == "id"));
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert!(invoker.calls().is_empty());
}

#[test]
fn test_arguments_bound_in_declared_order() {
    let mut builder = RouterBuilder::new();
    builder
        .get("/search/{q}/{page=1}/{lang?}", "SearchController::run")
        .unwrap();
    let invoker = RecordingInvoker::default();
    let router = builder.build(Arc::new(invoker.clone()));

    router
        .dispatch(&request("GET", "/search/{q}/{page=1}/{lang?}?lang=en&q=rust"))
        .unwrap();
    router
        .dispatch(&request("GET", "/search/{q}/{page=1}/{lang?}?q=tokio&page=3"))
        .unwrap();

    let args: Vec<_> = invoker.calls().into_iter().map(|c| c.args).collect();
    assert_eq!(
        args,
        vec![
            vec!["rust".to_string(), "1".to_string(), "en".to_string()],
            vec!["tokio".to_string(), "3".to_string()],
        ]
    );
}

#[test]
fn test_optional_placeholder_bound_from_first_query_param() {
    let mut builder = RouterBuilder::new();
    builder.get("/items/{tag?}", "Items::index").unwrap();
    let invoker = RecordingInvoker::default();
    let router = builder.build(Arc::new(invoker.clone()));

    assert_eq!(router.routes()[0].path, "/items/{tag?}");
    assert!(router.find("GET", "/items/{tag?}").is_some());

    router.dispatch(&request("GET", "/items/{tag?}?tag=x")).unwrap();
    router.dispatch(&request("GET", "/items/{tag?}")).unwrap();

    let args: Vec<_> = invoker.calls().into_iter().map(|c| c.args).collect();
    assert_eq!(args, vec![vec!["x".to_string()], vec![]]);
}

#[tokio::test]
async fn test_callable_handler_reads_named_arguments() {
    let mut builder = RouterBuilder::new();
    builder
        .get(
            "/greet/{name}/{greeting=hello}",
            HandlerSpec::callable(|args| {
                let text = format!(
                    "{} {}",
                    args.get("greeting").unwrap_or_default(),
                    args.get("name").unwrap_or_default()
                );
                Ok(switchboard::Response::new(text.into()))
            }),
        )
        .unwrap();
    let router = builder.build(Arc::new(RecordingInvoker::default()));

    let res = router
        .dispatch(&request("GET", "/greet/{name}/{greeting=hello}?name=ada"))
        .unwrap();
    assert_eq!(common::body_string(res).await, "hello ada");
}

#[test]
fn test_unregistered_class_middleware_fails_at_dispatch() {
    let mut builder = RouterBuilder::new();
    builder
        .add("GET", "/x", "X::y", vec!["NoSuchMiddleware".into()])
        .unwrap();
    let router = builder.build(Arc::new(RecordingInvoker::default()));

    let err = router.dispatch(&request("GET", "/x")).unwrap_err();
    assert!(matches!(err, RouterError::InvalidMiddlewareTarget(name) if name == "NoSuchMiddleware"));
}

#[test]
fn test_registered_class_middleware_runs_fresh_instance() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use switchboard::{HttpMiddleware, Next, Request, Response};

    static CREATED: AtomicUsize = AtomicUsize::new(0);

    struct Counting;

    impl Default for Counting {
        fn default() -> Self {
            CREATED.fetch_add(1, Ordering::SeqCst);
            Counting
        }
    }

    impl HttpMiddleware for Counting {
        fn execute(
            &self,
            request: &Request,
            response: Response,
            next: Next<'_>,
        ) -> Result<Response, RouterError> {
            next.run(request, response)
        }
    }

    let mut builder = RouterBuilder::new();
    builder.registry_mut().register::<Counting>("Counting");
    builder.add_middleware("Counting");
    builder.get("/x", "X::y").unwrap();
    let router = builder.build(Arc::new(RecordingInvoker::default()));

    router.dispatch(&request("GET", "/x")).unwrap();
    router.dispatch(&request("GET", "/x")).unwrap();
    assert_eq!(CREATED.load(Ordering::SeqCst), 2);
}

#[test]
fn test_routes_from_failed_group_callback_stay_guarded() {
    let log = event_log();
    let mut builder = RouterBuilder::new();
    let err = builder
        .group("admin", vec![blocker(&log, "admin", StatusCode::FORBIDDEN)], |g| {
            g.get("/panel", "Admin::panel")?;
            g.get("/broken", "NotAReference")
        })
        .unwrap_err();
    assert!(matches!(err, RouterError::InvalidHandlerFormat(_)));
    let invoker = RecordingInvoker::default();
    let router = builder.build(Arc::new(invoker.clone()));

    let res = router.dispatch(&request("GET", "/admin/panel")).unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(events(&log), vec!["admin"]);
    assert!(invoker.calls().is_empty());
}

#[test]
fn test_duplicate_registration_first_wins() {
    let mut builder = RouterBuilder::new();
    builder.get("/dup/{a}", "First::run").unwrap();
    builder.get("/dup/{a}", "Second::run").unwrap();
    let invoker = RecordingInvoker::default();
    let router = builder.build(Arc::new(invoker.clone()));

    router.dispatch(&request("GET", "/dup/{a}?a=1")).unwrap();

    assert_eq!(router.routes().len(), 1);
    assert_eq!(invoker.calls()[0].target.as_deref(), Some("First"));
}

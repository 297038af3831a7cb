//! Request inspection and request IDs.
//!
//! # Responsibilities
//! - Extract the routing path (query string stripped)
//! - Decode query parameters for argument binding
//! - Generate a UUID request ID for every incoming request

use std::collections::HashMap;

use axum::http::HeaderValue;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::Request;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Split a request target into path and query.
///
/// `?` and `#` inside a `{...}` placeholder belong to the path, so
/// `/items/{tag?}?tag=x` splits into `/items/{tag?}` and `tag=x`.
pub fn split_target(target: &str) -> (&str, Option<&str>) {
    let mut depth = 0usize;
    for (i, c) in target.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '?' | '#' if depth == 0 => {
                let rest = &target[i + 1..];
                let query = (c == '?').then(|| rest.split_once('#').map_or(rest, |(q, _)| q));
                return (&target[..i], query);
            }
            _ => {}
        }
    }
    (target, None)
}

/// Raw path and query as sent. `Uri` splits at the first `?`, which
/// may sit inside an optional placeholder.
fn target(request: &Request) -> &str {
    match request.uri().path_and_query() {
        Some(pq) => pq.as_str(),
        None => request.uri().path(),
    }
}

/// URI path without the query string.
pub fn request_path(request: &Request) -> &str {
    match split_target(target(request)) {
        ("", _) => "/",
        (path, _) => path,
    }
}

/// Decoded query parameters. Repeated names keep the last value.
pub fn query_params(request: &Request) -> HashMap<String, String> {
    split_target(target(request))
        .1
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default()
}

/// UUID v4 request IDs for `SetRequestIdLayer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

//! Route placeholders and argument binding.
//!
//! # Placeholder grammar
//! - `{id}`: required
//! - `{page?}`: optional, no default
//! - `{page=1}`: optional, defaults to `1`
//!
//! Placeholders are metadata only. The path keeps them literally and routing
//! compares whole path strings; values come from the query string.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::RouterError;

/// One named placeholder extracted from a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteParameter {
    pub name: String,
    pub required: bool,
    pub default: Option<String>,
}

impl RouteParameter {
    /// Parse the text between `{` and `}`.
    fn from_token(token: &str) -> Self {
        let token = token.trim();

        if let Some((name, default)) = token.split_once('=') {
            let default = default.trim();
            return Self {
                name: name.trim().to_string(),
                required: false,
                default: (!default.is_empty()).then(|| default.to_string()),
            };
        }

        if let Some(name) = token.strip_suffix('?') {
            return Self {
                name: name.trim().to_string(),
                required: false,
                default: None,
            };
        }

        Self {
            name: token.to_string(),
            required: true,
            default: None,
        }
    }
}

/// Extract placeholders from a pattern, in declaration order.
///
/// An unterminated `{` ends the scan.
pub fn parse_params(pattern: &str) -> Vec<RouteParameter> {
    let mut params = Vec::new();
    let mut rest = pattern;

    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            break;
        };
        params.push(RouteParameter::from_token(&after[..close]));
        rest = &after[close + 1..];
    }

    params
}

/// Values bound to a route's parameters, in declaration order.
///
/// Optional parameters with neither a query value nor a default are skipped,
/// so positions can shift; prefer [`BoundArguments::get`] when a route has
/// more than one optional parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoundArguments {
    entries: Vec<(String, String)>,
}

impl BoundArguments {
    /// Look up a bound value by parameter name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Bound values in positional order.
    pub fn positional(&self) -> Vec<&str> {
        self.entries.iter().map(|(_, v)| v.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve each parameter against the query: query value, then default,
/// then nothing for optional parameters.
pub fn bind_arguments(
    params: &[RouteParameter],
    query: &HashMap<String, String>,
) -> Result<BoundArguments, RouterError> {
    let mut entries = Vec::with_capacity(params.len());

    for param in params {
        match query.get(&param.name) {
            Some(value) => entries.push((param.name.clone(), value.clone())),
            None if param.required => {
                return Err(RouterError::MissingRequiredArgument(param.name.clone()));
            }
            None => {
                if let Some(default) = &param.default {
                    entries.push((param.name.clone(), default.clone()));
                }
            }
        }
    }

    Ok(BoundArguments { entries })
}

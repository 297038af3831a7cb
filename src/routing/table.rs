//! Route table keyed by method and literal path.

use std::collections::HashMap;

use crate::routing::route::Route;

/// Routes in registration order with an exact `(method, path)` index.
#[derive(Debug, Default, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
    index: HashMap<String, HashMap<String, usize>>,
}

impl RouteTable {
    /// Insert unless the `(method, path)` key is taken. Returns whether the
    /// route was stored.
    pub fn insert(&mut self, route: Route) -> bool {
        let by_path = self.index.entry(route.method().to_string()).or_default();
        if by_path.contains_key(route.path()) {
            return false;
        }
        by_path.insert(route.path().to_string(), self.routes.len());
        self.routes.push(route);
        true
    }

    pub fn find(&self, method: &str, path: &str) -> Option<&Route> {
        self.index
            .get(method)
            .and_then(|by_path| by_path.get(path))
            .map(|&i| &self.routes[i])
    }

    /// All routes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

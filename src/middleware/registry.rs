//! Name → factory lookup for class-reference middleware.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::RouterError;
use crate::middleware::HttpMiddleware;

type Factory = Arc<dyn Fn() -> Box<dyn HttpMiddleware> + Send + Sync>;

/// Resolves middleware class names to fresh instances.
#[derive(Clone, Default)]
pub struct MiddlewareRegistry {
    factories: HashMap<String, Factory>,
}

impl MiddlewareRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type constructed through `Default`.
    pub fn register<M>(&mut self, name: impl Into<String>) -> &mut Self
    where
        M: HttpMiddleware + Default + 'static,
    {
        self.register_with(name, || Box::new(M::default()) as Box<dyn HttpMiddleware>)
    }

    /// Register a zero-argument factory.
    pub fn register_with<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Box<dyn HttpMiddleware> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.factories.insert(name.clone(), Arc::new(factory)).is_some() {
            tracing::warn!(middleware = %name, "Middleware registration replaced");
        }
        self
    }

    /// Instantiate the middleware registered under `name`.
    pub fn resolve(&self, name: &str) -> Result<Box<dyn HttpMiddleware>, RouterError> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| RouterError::InvalidMiddlewareTarget(name.to_string()))
    }
}

impl fmt::Debug for MiddlewareRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.factories.keys().collect();
        names.sort();
        f.debug_struct("MiddlewareRegistry")
            .field("names", &names)
            .finish()
    }
}

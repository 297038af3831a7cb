//! Controller lookup for `Class::action` handlers.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::RouterError;
use crate::invoke::HandlerInvoker;
use crate::routing::{BoundArguments, HandlerTarget};
use crate::Response;

/// A class-style handler exposing named actions.
pub trait Controller: Send + Sync {
    /// Run `action`. Unknown actions should return
    /// [`RouterError::UnknownAction`].
    fn call(&self, action: &str, args: BoundArguments) -> Result<Response, RouterError>;
}

type Factory = Arc<dyn Fn() -> Box<dyn Controller> + Send + Sync>;

/// Default [`HandlerInvoker`]: calls closures directly and builds a fresh
/// controller per request for class targets.
#[derive(Clone, Default)]
pub struct ControllerRegistry {
    factories: HashMap<String, Factory>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a controller constructed through `Default`.
    pub fn register<C>(&mut self, name: impl Into<String>) -> &mut Self
    where
        C: Controller + Default + 'static,
    {
        self.register_with(name, || Box::new(C::default()) as Box<dyn Controller>)
    }

    /// Register a zero-argument factory, e.g. one cloning shared state.
    pub fn register_with<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Box<dyn Controller> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
        self
    }
}

impl HandlerInvoker for ControllerRegistry {
    fn invoke(
        &self,
        target: &HandlerTarget,
        action: Option<&str>,
        args: BoundArguments,
    ) -> Result<Response, RouterError> {
        match target {
            HandlerTarget::Callable(f) => f(args),
            HandlerTarget::Class(name) => {
                let factory = self
                    .factories
                    .get(name)
                    .ok_or_else(|| RouterError::UnresolvedHandler(name.clone()))?;
                let action = action.ok_or_else(|| RouterError::UnknownAction {
                    target: name.clone(),
                    action: String::new(),
                })?;
                factory().call(action, args)
            }
        }
    }
}

impl fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.factories.keys().collect();
        names.sort();
        f.debug_struct("ControllerRegistry")
            .field("controllers", &names)
            .finish()
    }
}

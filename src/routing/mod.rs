//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (at startup):
//!     get/post/add/group
//!     → builder.rs (prefix expansion, handler parsing)
//!     → params.rs (placeholder extraction)
//!     → table.rs (keyed by method, then literal path)
//!     → Freeze as immutable Router
//!
//! Incoming Request (method, path, query)
//!     → router.rs (exact lookup)
//!     → middleware tiers: global → route → groups
//!     → params.rs (argument binding)
//!     → invoker
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No pattern matching: the registered path string is the key
//! - First registration wins for a `(method, path)` key

pub mod builder;
pub mod params;
pub mod route;
pub mod router;
pub mod table;

pub use builder::{Group, Registrar, RouterBuilder};
pub use params::{BoundArguments, RouteParameter};
pub use route::{CallableHandler, HandlerSpec, HandlerTarget, Route};
pub use router::{RouteInfo, Router};

//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config loaded → Router frozen → Metrics exporter → Bind → Serve
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     Broadcast trigger or SIGTERM/SIGINT → Stop accepting → Drain → Exit
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;

//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Resolve config → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Mark draining → Stop accepting → Drain requests → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered shutdown: fail health checks, stop accept, drain, close
//! - Shutdown has a timeout; the caller decides whether to force-close

pub mod shutdown;
pub mod signals;

pub use shutdown::{Shutdown, ShutdownError};

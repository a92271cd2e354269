//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, accept loop)
//!     → in-flight tracking middleware
//!     → route handlers (/, /healthz, fallback)
//!     → Send response to client
//! ```

pub mod server;

pub use server::{BackendServer, BindError, ServerHandle};

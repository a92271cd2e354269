//! A single backend node for a load-balanced fleet.
//!
//! Serves HTTP/1.1 over TCP, identifies itself by listening port on
//! `GET /`, exposes a readiness signal on `GET /healthz`, and drains
//! in-flight requests on shutdown so the load balancer in front of it
//! never sees dropped work.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod state;

pub use config::{ConfigError, ServerConfig};
pub use http::{BackendServer, BindError, ServerHandle};
pub use lifecycle::{Shutdown, ShutdownError};
pub use state::ServiceState;

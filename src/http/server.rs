//! HTTP server setup and request handling.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (tracing, timeout, in-flight tracking)
//! - Bind the listening socket and run the serve loop
//! - Graceful shutdown: stop accepting, drain in-flight requests
//!
//! Routing is a static exact match on (method, path); anything else is 404.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::{Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::lifecycle::{Shutdown, ShutdownError};
use crate::state::ServiceState;

/// Upper bound on a single request, enforced as a middleware layer.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Error returned when the listening socket cannot be bound.
#[derive(Debug, Error)]
#[error("failed to bind port {port}: {source}")]
pub struct BindError {
    pub port: u16,
    #[source]
    pub source: std::io::Error,
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Port the server listens on, echoed in the root response.
    port: u16,
    /// Shared lifecycle state (in-flight counter, drain flag).
    service: Arc<ServiceState>,
}

/// One backend node: an HTTP server identifying itself by listening port.
pub struct BackendServer {
    config: ServerConfig,
    state: Arc<ServiceState>,
}

impl BackendServer {
    /// Create a new server with the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            state: Arc::new(ServiceState::new()),
        }
    }

    /// Bind the listening socket and start serving.
    ///
    /// Returns a handle used to observe and shut down the running server.
    pub async fn start(self) -> Result<ServerHandle, BindError> {
        let port = self.config.port;
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| BindError { port, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| BindError { port, source })?;

        tracing::info!(address = %local_addr, "Listening for connections");

        let app = build_router(AppState {
            port,
            service: Arc::clone(&self.state),
        });

        let shutdown = Shutdown::new();
        let mut shutdown_rx = shutdown.subscribe();
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.recv().await;
                })
                .await
        });

        Ok(ServerHandle {
            local_addr,
            state: self.state,
            shutdown,
            task,
        })
    }
}

/// Handle to a running server.
///
/// Owns the shared [`ServiceState`] and the shutdown trigger for the serve
/// loop. Dropping the handle drops the trigger, which stops the serve loop
/// without waiting for a drain.
#[derive(Debug)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    state: Arc<ServiceState>,
    shutdown: Shutdown,
    task: JoinHandle<std::io::Result<()>>,
}

impl ServerHandle {
    /// Address the server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Shared lifecycle state for this server.
    pub fn state(&self) -> Arc<ServiceState> {
        Arc::clone(&self.state)
    }

    /// Number of requests currently being handled.
    pub fn in_flight(&self) -> usize {
        self.state.in_flight()
    }

    /// Shut down gracefully.
    ///
    /// Marks the service as draining (health checks fail from here on),
    /// stops accepting new connections, then waits for in-flight requests
    /// to finish. Already-accepted requests run to completion; none are
    /// cancelled. Returns [`ShutdownError::Timeout`] if the drain does not
    /// finish within `timeout`; the caller decides whether to
    /// [`force_close`](Self::force_close).
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), ShutdownError> {
        self.state.begin_drain();
        self.shutdown.trigger();
        tracing::info!(
            in_flight = self.state.in_flight(),
            timeout = ?timeout,
            "Draining"
        );

        match tokio::time::timeout(timeout, self.state.drained()).await {
            Ok(()) => Ok(()),
            Err(_) => Err(ShutdownError::Timeout {
                after: timeout,
                in_flight: self.state.in_flight(),
            }),
        }
    }

    /// Wait for the serve loop to exit and the listening socket to close.
    pub async fn closed(self) -> std::io::Result<()> {
        match self.task.await {
            Ok(result) => result,
            // Aborted via force_close.
            Err(_) => Ok(()),
        }
    }

    /// Abort the serve loop, closing the listener and any remaining
    /// connections immediately.
    pub fn force_close(self) {
        self.task.abort();
    }
}

/// Build the Axum router with all middleware layers.
fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", any(root))
        .route("/healthz", any(healthz))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            track_in_flight,
        ))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Count every request while it is being handled.
///
/// The guard decrements on drop, so error responses and timeouts are
/// accounted for as well.
async fn track_in_flight(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let _guard = state.service.begin_request();
    next.run(request).await
}

/// `GET /` — identify this node by its listening port.
async fn root(method: Method, State(state): State<AppState>) -> Response {
    if method != Method::GET {
        return StatusCode::NOT_FOUND.into_response();
    }
    format!("Response from server running on port {}", state.port).into_response()
}

/// `GET /healthz` — readiness signal polled by the load balancer.
///
/// 200 while accepting traffic, 503 from shutdown initiation onward so the
/// balancer stops routing new requests here.
async fn healthz(method: Method, State(state): State<AppState>) -> Response {
    if method != Method::GET {
        return StatusCode::NOT_FOUND.into_response();
    }
    if state.service.is_draining() {
        (StatusCode::SERVICE_UNAVAILABLE, "draining").into_response()
    } else {
        "ok".into_response()
    }
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

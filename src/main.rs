//! backend-node binary.
//!
//! Resolves configuration from the environment, serves until a
//! termination signal arrives, then drains with a fixed grace period.
//!
//! Exit codes: 0 after a clean drain, non-zero when the bind fails or
//! the drain times out and the process force-closes.

use std::process::ExitCode;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use backend_node::lifecycle::signals;
use backend_node::{BackendServer, ServerConfig};

/// How long in-flight requests get to finish after a termination signal.
const GRACE_PERIOD: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backend_node=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let handle = match BackendServer::new(config).start().await {
        Ok(handle) => handle,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(port = config.port, "Server started");

    signals::shutdown_signal().await;

    match handle.shutdown(GRACE_PERIOD).await {
        Ok(()) => {
            // Drained; wait briefly for the listener itself to close.
            let _ = tokio::time::timeout(Duration::from_secs(5), handle.closed()).await;
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Forcing close");
            handle.force_close();
            ExitCode::FAILURE
        }
    }
}

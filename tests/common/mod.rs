//! Shared utilities for integration testing.

use backend_node::{BackendServer, ServerConfig, ServerHandle};

/// Start a server on a fixed port and wait until it accepts connections.
pub async fn start_server(port: u16) -> ServerHandle {
    let config = ServerConfig::new(port).expect("valid test port");
    let handle = BackendServer::new(config)
        .start()
        .await
        .expect("test port should be free");
    assert_eq!(handle.local_addr().port(), port);

    // The listener is bound before start() returns; one request confirms
    // the serve loop is up.
    let health = reqwest::get(url(port, "/healthz")).await.unwrap();
    assert_eq!(health.status(), reqwest::StatusCode::OK);

    handle
}

pub fn url(port: u16, path: &str) -> String {
    format!("http://127.0.0.1:{port}{path}")
}

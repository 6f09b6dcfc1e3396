//! Integration tests for the Strategy Payoff API.
//!
//! Set `API_BASE_URL` to run the tests against a running server. Otherwise
//! each test starts the router in-process on an ephemeral local port.

use payoff_client::{ClientConfig, PayoffClient};
use std::sync::Arc;
use std::time::Duration;
use strategy_payoff_backend::api::create_router;
use strategy_payoff_backend::state::AppState;
use tokio::net::TcpListener;

/// Starts the API on `127.0.0.1` with default configuration and returns its base URL.
///
/// The server runs on the current tokio runtime and stops with it.
///
/// # Errors
/// Returns error if the state cannot be built or the port cannot be bound.
pub async fn spawn_server() -> std::io::Result<String> {
    let state = AppState::new().map_err(std::io::Error::other)?;
    let app = create_router(Arc::new(state));

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app).await {
            eprintln!("test server on {} stopped: {}", addr, err);
        }
    });

    Ok(format!("http://{}", addr))
}

/// Gets the API base URL from the environment, or spawns a local server.
///
/// # Errors
/// Returns error if a local server cannot be started.
pub async fn get_api_url() -> std::io::Result<String> {
    match std::env::var("API_BASE_URL") {
        Ok(url) => Ok(url),
        Err(_) => spawn_server().await,
    }
}

/// Creates a test client configured for the API.
///
/// # Errors
/// Returns error if the server cannot be reached or client creation fails.
pub async fn create_test_client() -> Result<PayoffClient, Box<dyn std::error::Error>> {
    let client = PayoffClient::new(ClientConfig {
        base_url: get_api_url().await?,
        timeout: Duration::from_secs(10),
    })?;
    Ok(client)
}

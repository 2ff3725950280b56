//! Integration tests for Shopcart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopcart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - `CartStore` over file storage, as the CLI uses it
//! - `storefront_http` - the storefront served on a local port, driven by a
//!   cookie-keeping HTTP client
//!
//! Nothing external is required: servers bind to an ephemeral port on
//! 127.0.0.1 and files go to temporary directories.

use std::net::SocketAddr;

use serde_json::Value;
use shopcart_store::Catalog;
use shopcart_storefront::app;
use shopcart_storefront::config::StorefrontConfig;
use shopcart_storefront::state::AppState;
use tokio::task::JoinHandle;

/// A storefront running in the background for the duration of a test.
pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Serve the demo catalog with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn start() -> std::io::Result<Self> {
        Self::start_with(AppState::new(StorefrontConfig::default(), Catalog::demo())).await
    }

    /// Serve the given state.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn start_with(state: AppState) -> std::io::Result<Self> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            // Ends when the test aborts the task
            let _ = axum::serve(listener, app(state)).await;
        });
        Ok(Self { addr, handle })
    }

    /// Absolute URL for a path on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// An HTTP client that keeps cookies, i.e. one browser session.
///
/// # Errors
///
/// Returns an error if the client cannot be built.
pub fn session_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().cookie_store(true).build()
}

/// POST a JSON body and decode the JSON response.
///
/// # Errors
///
/// Returns an error if the request fails or the body is not JSON.
pub async fn post_json(
    client: &reqwest::Client,
    url: &str,
    body: &Value,
) -> reqwest::Result<(reqwest::StatusCode, Value)> {
    let response = client.post(url).json(body).send().await?;
    let status = response.status();
    Ok((status, response.json().await?))
}

/// GET a URL and decode the JSON response.
///
/// # Errors
///
/// Returns an error if the request fails or the body is not JSON.
pub async fn get_json(client: &reqwest::Client, url: &str) -> reqwest::Result<Value> {
    client.get(url).send().await?.json().await
}

//! Async wrapper around [`ShopClient`] for use in async runtimes (Tokio, etc.).
//!
//! Runs every call on the blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free while
//! the blocking HTTP client waits on the server.
//!
//! # Example
//!
//! ```no_run
//! use cable_shop::AsyncShopClient;
//!
//! # async fn example() -> cable_shop::Result<()> {
//! let client = AsyncShopClient::builder().build().await?;
//! client.login("admin@shop.lk", "secret").await?;
//!
//! let low = client
//!     .run(|c| Ok(cable_shop::report::low_stock_report_rows(&c.products().list()?)))
//!     .await?;
//! println!("{} products need restocking", low.len());
//!
//! client.close().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{Result, ShopError};
use crate::models::{DashboardSummary, Order, Product, User};
use crate::{ShopClient, ShopClientBuilder, ShopConfig};

// ---------------------------------------------------------------------------
// AsyncShopClientBuilder
// ---------------------------------------------------------------------------

/// Builder for an [`AsyncShopClient`]; mirrors [`ShopClientBuilder`].
pub struct AsyncShopClientBuilder {
    inner: ShopClientBuilder,
}

impl Default for AsyncShopClientBuilder {
    fn default() -> Self {
        Self {
            inner: ShopClient::builder(),
        }
    }
}

impl AsyncShopClientBuilder {
    pub fn from_config(config: &ShopConfig) -> Self {
        Self {
            inner: ShopClientBuilder::from_config(config),
        }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.inner = self.inner.base_url(url);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.inner = self.inner.timeout(timeout);
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.inner = self.inner.token(token);
        self
    }

    /// Build the client on the blocking pool; the blocking HTTP client
    /// must not be created on an async worker thread.
    pub async fn build(self) -> Result<AsyncShopClient> {
        tokio::task::spawn_blocking(move || {
            let client = self.inner.build()?;
            Ok(AsyncShopClient {
                inner: Arc::new(Mutex::new(client)),
            })
        })
        .await
        .map_err(|e| ShopError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncShopClient
// ---------------------------------------------------------------------------

/// Async wrapper around [`ShopClient`].
///
/// The client is behind a [`Mutex`] since its session stores the token in a
/// `RefCell`. Finish with [`close()`](Self::close) so the blocking HTTP
/// client is dropped off the async threads.
pub struct AsyncShopClient {
    inner: Arc<Mutex<ShopClient>>,
}

impl AsyncShopClient {
    pub fn builder() -> AsyncShopClientBuilder {
        AsyncShopClientBuilder::default()
    }

    /// Run any sync client operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&ShopClient) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let client = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = client
                .lock()
                .map_err(|_| ShopError::InvalidArgument("client lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| ShopError::InvalidArgument(format!("Task join error: {e}")))?
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let email = email.to_string();
        let password = password.to_string();
        self.run(move |c| c.auth().login(&email, &password)).await
    }

    pub async fn products(&self) -> Result<Vec<Product>> {
        self.run(|c| c.products().list()).await
    }

    pub async fn orders(&self) -> Result<Vec<Order>> {
        self.run(|c| c.orders().list()).await
    }

    pub async fn dashboard(&self) -> Result<DashboardSummary> {
        self.run(|c| c.dashboard()).await
    }

    /// Close the client, releasing the connection pool.
    pub async fn close(self) -> Result<()> {
        tokio::task::spawn_blocking(move || {
            let client = self
                .inner
                .lock()
                .map_err(|_| ShopError::InvalidArgument("client lock poisoned".into()))?;
            drop(client);
            drop(self.inner);
            Ok(())
        })
        .await
        .map_err(|e| ShopError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

//! Client library for the cable shop point-of-sale backend.
//!
//! Wraps the shop's REST API (login, catalog, categories, orders), keeps the
//! point-of-sale cart, aggregates sales and stock reports from fetched
//! snapshots and prints invoices and reports to PDF.
//!
//! # Quick start
//!
//! ```no_run
//! use cable_shop::{Cart, ShopClient};
//! use rust_decimal::Decimal;
//!
//! let client = ShopClient::builder()
//!     .base_url("http://localhost:5000/api/")
//!     .build()
//!     .unwrap();
//! client.auth().login("admin@shop.lk", "secret").unwrap();
//!
//! let products = client.products().list().unwrap();
//! let mut cart = Cart::new();
//! cart.add_or_increment(&products[0]);
//!
//! let notice = cable_shop::workflow::checkout(&client, &mut cart, Decimal::ZERO);
//! println!("{}: {}", notice.title, notice.message);
//! ```

pub mod api;
#[cfg(feature = "async")]
pub mod async_client;
pub mod cart;
pub mod config;
pub mod error;
pub mod image_host;
pub mod models;
pub mod query_builder;
pub mod render;
pub mod report;
pub mod session;
pub mod workflow;

#[cfg(feature = "async")]
pub use async_client::AsyncShopClient;
pub use cart::{Cart, CartLine};
pub use config::ShopConfig;
pub use error::{Result, ShopError};
pub use image_host::ImageHost;
pub use query_builder::QueryBuilder;
pub use render::ReportRenderer;
pub use session::Session;

use std::fmt;
use std::time::Duration;

// ---------------------------------------------------------------------------
// ShopClientBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`ShopClient`].
///
/// Use [`ShopClient::builder()`] to obtain one, or
/// [`ShopClientBuilder::from_config`] to start from loaded settings.
pub struct ShopClientBuilder {
    base_url: String,
    timeout: Duration,
    token: Option<String>,
}

impl Default for ShopClientBuilder {
    fn default() -> Self {
        Self {
            base_url: config::DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(config::DEFAULT_TIMEOUT_SECS),
            token: None,
        }
    }
}

impl ShopClientBuilder {
    pub fn from_config(config: &ShopConfig) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            timeout: config.timeout(),
            token: None,
        }
    }

    /// Set the API root, e.g. `http://localhost:5000/api/`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the per-request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Start with a token from an earlier login.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Build the client. No request is sent until the first call.
    pub fn build(self) -> Result<ShopClient> {
        let session = Session::new(&self.base_url, self.timeout)?;
        if let Some(token) = self.token {
            session.set_token(token);
        }
        tracing::debug!(base_url = %session.base_url(), "shop client ready");
        Ok(ShopClient { session })
    }
}

// ---------------------------------------------------------------------------
// ShopClient
// ---------------------------------------------------------------------------

/// Entry point to the shop API.
///
/// Owns one [`Session`] and hands out lightweight borrowing wrappers per
/// resource, so the token stored by [`api::AuthApi::login`] is used by every
/// later call.
pub struct ShopClient {
    session: Session,
}

impl ShopClient {
    pub fn builder() -> ShopClientBuilder {
        ShopClientBuilder::default()
    }

    pub fn auth(&self) -> api::AuthApi<'_> {
        api::AuthApi::new(&self.session)
    }

    pub fn products(&self) -> api::ProductApi<'_> {
        api::ProductApi::new(&self.session)
    }

    pub fn categories(&self) -> api::CategoryApi<'_> {
        api::CategoryApi::new(&self.session)
    }

    pub fn orders(&self) -> api::OrderApi<'_> {
        api::OrderApi::new(&self.session)
    }

    /// Fetch products, categories and orders and summarize them for the
    /// dashboard.
    pub fn dashboard(&self) -> Result<models::DashboardSummary> {
        let products = self.products().list()?;
        let categories = self.categories().list()?;
        let orders = self.orders().list()?;
        Ok(report::dashboard(&products, &categories, &orders))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Consume the client and drop its connection pool.
    pub fn close(self) {
        drop(self);
    }
}

impl fmt::Display for ShopClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ShopClient(base_url={}, authenticated={})",
            self.session.base_url(),
            self.session.is_authenticated()
        )
    }
}

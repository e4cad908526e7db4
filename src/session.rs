//! Shared HTTP session: one blocking client, the API base URL and the
//! bearer token attached after login.
//!
//! Every API wrapper borrows the same [`Session`], so the token set by a
//! successful login is seen by all subsequent catalog and order calls.

use std::cell::RefCell;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, ShopError};

/// HTTP plumbing shared by the API wrappers.
pub struct Session {
    client: Client,
    base_url: Url,
    token: RefCell<Option<String>>,
}

impl Session {
    /// Create a session against `base_url`.
    ///
    /// A trailing slash is appended when missing so relative endpoint paths
    /// resolve beneath it rather than replacing the last segment.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized)
            .map_err(|e| ShopError::InvalidArgument(format!("bad API base URL {}: {}", base_url, e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self {
            client,
            base_url,
            token: RefCell::new(None),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying HTTP client, for calls outside the shop API.
    pub fn client(&self) -> &Client {
        &self.client
    }

    // -- Authentication ------------------------------------------------------

    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.borrow_mut() = Some(token.into());
    }

    pub fn clear_token(&self) {
        *self.token.borrow_mut() = None;
    }

    pub fn token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token
            .borrow()
            .as_deref()
            .map(|t| !t.is_empty())
            .unwrap_or(false)
    }

    // -- Requests ------------------------------------------------------------

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ShopError::InvalidArgument(format!("bad endpoint path {}: {}", path, e)))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.url(path)?;
        let mut req = self.client.request(method, url);
        if let Some(token) = self.token.borrow().as_deref() {
            req = req.bearer_auth(token);
        }
        Ok(req)
    }

    /// Send a request and turn non-success statuses into [`ShopError::Status`].
    fn send(&self, method: Method, path: &str, req: RequestBuilder) -> Result<Response> {
        tracing::debug!(%method, path, "sending request");
        let resp = req.send()?;
        let status = resp.status();
        tracing::debug!(%method, path, status = status.as_u16(), "received response");

        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().unwrap_or_default();
        tracing::warn!(%method, path, status = status.as_u16(), body = %body, "request failed");
        Err(ShopError::Status {
            status: status.as_u16(),
            body,
        })
    }

    pub fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let req = self.request(Method::GET, path)?;
        let resp = self.send(Method::GET, path, req)?;
        Ok(resp.json()?)
    }

    pub fn get_json_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T> {
        let req = self.request(Method::GET, path)?.query(query);
        let resp = self.send(Method::GET, path, req)?;
        Ok(resp.json()?)
    }

    pub fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.request(Method::POST, path)?.json(body);
        let resp = self.send(Method::POST, path, req)?;
        Ok(resp.json()?)
    }

    pub fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.request(Method::PUT, path)?.json(body);
        let resp = self.send(Method::PUT, path, req)?;
        Ok(resp.json()?)
    }

    pub fn delete(&self, path: &str) -> Result<()> {
        let req = self.request(Method::DELETE, path)?;
        self.send(Method::DELETE, path, req)?;
        Ok(())
    }
}

//! Login against `POST /Auth/Login` and bearer token management.

use crate::config::endpoints;
use crate::error::{Result, ShopError};
use crate::models::{LoginRequest, LoginResponse, User};
use crate::session::Session;

// ---------------------------------------------------------------------------
// AuthApi
// ---------------------------------------------------------------------------

/// Login/logout for the operator using the desktop shell.
pub struct AuthApi<'a> {
    session: &'a Session,
}

impl<'a> AuthApi<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Exchange credentials for a JWT and attach it to every later request.
    ///
    /// Blank credentials are rejected before any request is sent. A 2xx
    /// response without a token is treated as [`ShopError::Unauthorized`].
    pub fn login(&self, email: &str, password: &str) -> Result<User> {
        if email.trim().is_empty() || password.trim().is_empty() {
            return Err(ShopError::Validation(
                "Please Enter Username & Password.".to_string(),
            ));
        }

        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.session.post_json(endpoints::LOGIN, &request)?;

        let token = match response.jwt_token {
            Some(t) if !t.is_empty() => t,
            _ => return Err(ShopError::Unauthorized),
        };

        self.session.set_token(token.clone());
        tracing::info!("logged in");

        Ok(User {
            email: request.email,
            jwt_token: token,
        })
    }

    /// Forget the stored token.
    pub fn logout(&self) {
        self.session.clear_token();
        tracing::info!("logged out");
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }
}

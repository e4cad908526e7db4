use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// LoginRequest / LoginResponse - POST /Auth/Login
// ---------------------------------------------------------------------------

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub jwt_token: Option<String>,
}

// ---------------------------------------------------------------------------
// User - The logged-in operator
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub email: String,
    pub jwt_token: String,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("email", &self.email)
            .field("jwt_token", &"<redacted>")
            .finish()
    }
}

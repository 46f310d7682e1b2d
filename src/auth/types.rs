// Authentication types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// v2 login endpoint (default)
pub const V2_AUTH_URL: &str = "https://lolesports-api.bayesesports.com/v2/auth/login";

/// v1 login endpoint (legacy)
pub const V1_AUTH_URL: &str = "https://lolesports-api.bayesesports.com/auth/login";

/// Login endpoint version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthEndpoint {
    /// Legacy endpoint at /auth/login
    V1,

    /// Current endpoint at /v2/auth/login
    #[default]
    V2,
}

impl AuthEndpoint {
    /// Select the endpoint from the `v1_auth` flag
    pub fn from_v1_flag(v1_auth: bool) -> Self {
        if v1_auth {
            AuthEndpoint::V1
        } else {
            AuthEndpoint::V2
        }
    }

    pub fn url(&self) -> &'static str {
        match self {
            AuthEndpoint::V1 => V1_AUTH_URL,
            AuthEndpoint::V2 => V2_AUTH_URL,
        }
    }
}

/// Username/password pair, fixed for the lifetime of a manager
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Login request body
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

impl<'a> From<&'a Credentials> for LoginRequest<'a> {
    fn from(creds: &'a Credentials) -> Self {
        Self {
            username: &creds.username,
            password: &creds.password,
        }
    }
}

/// Login response body
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    /// Seconds until expiry; sign and magnitude are not checked
    pub expires_in: i64,
}

/// A token together with the instant it stops being valid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Cached token state owned by the manager
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TokenState {
    /// No login has succeeded yet
    #[default]
    Unauthenticated,

    /// Result of the most recent successful login
    Cached(CachedToken),
}

impl TokenState {
    pub fn cached(&self) -> Option<&CachedToken> {
        match self {
            TokenState::Unauthenticated => None,
            TokenState::Cached(cached) => Some(cached),
        }
    }
}

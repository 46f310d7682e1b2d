use std::fmt;

use crate::error::{AuthError, Result};

/// Default HTTP request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 30;

/// Default HTTP connect timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 10;

#[derive(Clone)]
pub struct AuthConfig {
    // Credentials
    pub username: String,
    pub password: String,

    // Endpoint
    pub v1_auth: bool,
    pub auth_url: Option<String>,

    // HTTP client
    pub request_timeout: u64,
    pub connect_timeout: u64,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("v1_auth", &self.v1_auth)
            .field("auth_url", &self.auth_url)
            .field("request_timeout", &self.request_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl AuthConfig {
    /// Configuration with default endpoint (v2) and timeouts
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            v1_auth: false,
            auth_url: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Load configuration from the environment, reading `.env` first if present
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let username = lookup("BAYES_USERNAME")
            .ok_or_else(|| AuthError::Config("BAYES_USERNAME is required".to_string()))?;
        let password = lookup("BAYES_PASSWORD")
            .ok_or_else(|| AuthError::Config("BAYES_PASSWORD is required".to_string()))?;

        let config = AuthConfig {
            username,
            password,

            v1_auth: lookup("BAYES_V1_AUTH")
                .map(|s| parse_bool(&s))
                .unwrap_or(false),

            auth_url: lookup("BAYES_AUTH_URL").filter(|s| !s.is_empty()),

            request_timeout: lookup("BAYES_HTTP_TIMEOUT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT),

            connect_timeout: lookup("BAYES_CONNECT_TIMEOUT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.username.is_empty() {
            return Err(AuthError::Config("username must not be empty".to_string()));
        }
        if self.password.is_empty() {
            return Err(AuthError::Config("password must not be empty".to_string()));
        }

        Ok(())
    }
}

/// Parse a boolean flag from string
fn parse_bool(s: &str) -> bool {
    matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

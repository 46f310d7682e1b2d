use chrono::{DateTime, Duration, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::clock::{Clock, SystemClock};
use super::login::{LoginTransport, ReqwestTransport};
use super::types::{AuthEndpoint, CachedToken, Credentials, LoginResponse, TokenState};
use crate::config::{AuthConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT};
use crate::error::{AuthError, Result};

/// Token manager
/// Caches one credential's bearer token and logs in again once it expires
///
/// The cached state sits behind an async mutex that is held across the
/// whole check-then-login sequence, so a shared manager never issues two
/// logins for the same expiry and never hands out a torn token/expiry pair.
pub struct TokenManager {
    /// Login credentials
    credentials: Credentials,

    /// Endpoint version the manager was built for
    endpoint: AuthEndpoint,

    /// URL the login request is sent to
    auth_url: String,

    /// Performs the login POST
    transport: Arc<dyn LoginTransport>,

    /// Time source for expiry calculations
    clock: Arc<dyn Clock>,

    /// Current cached token
    state: Mutex<TokenState>,
}

impl TokenManager {
    /// Create a manager for the given credentials
    /// `v1_auth` selects the legacy login endpoint
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        v1_auth: bool,
    ) -> Result<Self> {
        Self::builder(username, password).v1_auth(v1_auth).build()
    }

    /// Create a manager from a loaded configuration
    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        let mut builder = Self::builder(config.username.clone(), config.password.clone())
            .v1_auth(config.v1_auth)
            .timeouts(config.request_timeout, config.connect_timeout);

        if let Some(ref url) = config.auth_url {
            builder = builder.auth_url(url.clone());
        }

        builder.build()
    }

    pub fn builder(username: impl Into<String>, password: impl Into<String>) -> TokenManagerBuilder {
        TokenManagerBuilder::new(Credentials::new(username, password))
    }

    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    pub fn endpoint(&self) -> AuthEndpoint {
        self.endpoint
    }

    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }

    /// Log in and overwrite the cached token
    pub async fn login(&self) -> Result<String> {
        let mut state = self.state.lock().await;
        self.login_locked(&mut state).await
    }

    /// Cache the token from a login response and return it
    /// The expiry is `now + expires_in` with no validation of `expires_in`
    pub async fn store_token(&self, response: LoginResponse) -> String {
        let mut state = self.state.lock().await;
        self.store_locked(&mut state, response)
    }

    /// Whether the cached token has reached its expiry
    ///
    /// Fails with [`AuthError::NotAuthenticated`] if no token was ever stored.
    pub async fn is_refresh_required(&self) -> Result<bool> {
        let state = self.state.lock().await;
        let cached = state.cached().ok_or(AuthError::NotAuthenticated)?;
        Ok(cached.is_expired_at(self.clock.now()))
    }

    /// Get a valid token, logging in if none is cached or it has expired
    pub async fn get_token(&self) -> Result<String> {
        let mut state = self.state.lock().await;

        if let Some(cached) = state.cached() {
            if !cached.is_expired_at(self.clock.now()) {
                tracing::debug!("Reusing cached token");
                return Ok(cached.token.clone());
            }
            tracing::info!("Cached token expired at {}", cached.expires_at.to_rfc3339());
        }

        self.login_locked(&mut state).await
    }

    /// `Bearer <token>` for the current valid token
    pub async fn bearer(&self) -> Result<String> {
        Ok(format!("Bearer {}", self.get_token().await?))
    }

    /// Single-entry header map carrying `Authorization: Bearer <token>`
    pub async fn auth_header(&self) -> Result<HeaderMap> {
        let mut value = HeaderValue::from_str(&self.bearer().await?).map_err(|_| {
            AuthError::MalformedResponse(
                "access token contains characters not allowed in a header".to_string(),
            )
        })?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::with_capacity(1);
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }

    /// Expiry of the cached token, if any
    pub async fn expires_at(&self) -> Option<DateTime<Utc>> {
        let state = self.state.lock().await;
        state.cached().map(|cached| cached.expires_at)
    }

    async fn login_locked(&self, state: &mut TokenState) -> Result<String> {
        tracing::info!(
            username = %self.credentials.username,
            url = %self.auth_url,
            "Logging in to Bayes API..."
        );

        let response = self
            .transport
            .login(&self.auth_url, &self.credentials)
            .await?;

        Ok(self.store_locked(state, response))
    }

    fn store_locked(&self, state: &mut TokenState, response: LoginResponse) -> String {
        let expires_at = expiry_from(self.clock.now(), response.expires_in);
        let token = response.access_token;

        tracing::info!("Token stored, expires: {}", expires_at.to_rfc3339());

        *state = TokenState::Cached(CachedToken {
            token: token.clone(),
            expires_at,
        });
        token
    }
}

/// `now + expires_in` seconds, saturating at the representable range
fn expiry_from(now: DateTime<Utc>, expires_in: i64) -> DateTime<Utc> {
    Duration::try_seconds(expires_in)
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(if expires_in >= 0 {
            DateTime::<Utc>::MAX_UTC
        } else {
            DateTime::<Utc>::MIN_UTC
        })
}

/// Builder for [`TokenManager`]
pub struct TokenManagerBuilder {
    credentials: Credentials,
    endpoint: AuthEndpoint,
    auth_url: Option<String>,
    transport: Option<Arc<dyn LoginTransport>>,
    clock: Arc<dyn Clock>,
    request_timeout: u64,
    connect_timeout: u64,
}

impl TokenManagerBuilder {
    fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            endpoint: AuthEndpoint::default(),
            auth_url: None,
            transport: None,
            clock: Arc::new(SystemClock),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn v1_auth(mut self, v1_auth: bool) -> Self {
        self.endpoint = AuthEndpoint::from_v1_flag(v1_auth);
        self
    }

    pub fn endpoint(mut self, endpoint: AuthEndpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Send logins to this URL instead of the endpoint's fixed one
    pub fn auth_url(mut self, url: impl Into<String>) -> Self {
        self.auth_url = Some(url.into());
        self
    }

    pub fn transport(mut self, transport: Arc<dyn LoginTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Request and connect timeouts in seconds for the default transport
    pub fn timeouts(mut self, request_timeout: u64, connect_timeout: u64) -> Self {
        self.request_timeout = request_timeout;
        self.connect_timeout = connect_timeout;
        self
    }

    pub fn build(self) -> Result<TokenManager> {
        if self.credentials.username.is_empty() {
            return Err(AuthError::Config("username must not be empty".to_string()));
        }
        if self.credentials.password.is_empty() {
            return Err(AuthError::Config("password must not be empty".to_string()));
        }

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(
                self.request_timeout,
                self.connect_timeout,
            )?),
        };

        let auth_url = self
            .auth_url
            .unwrap_or_else(|| self.endpoint.url().to_string());

        Ok(TokenManager {
            credentials: self.credentials,
            endpoint: self.endpoint,
            auth_url,
            transport,
            clock: self.clock,
            state: Mutex::new(TokenState::Unauthenticated),
        })
    }
}

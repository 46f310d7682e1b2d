use reqwest::{Client, RequestBuilder, Response};
use std::sync::Arc;
use std::time::Duration;

use crate::auth::TokenManager;
use crate::error::{AuthError, Result};

/// HTTP client for the Bayes data API
/// Attaches the current bearer token to every request
pub struct BayesHttpClient {
    /// Shared HTTP client with connection pooling
    client: Client,

    /// Token manager
    token_manager: Arc<TokenManager>,
}

impl BayesHttpClient {
    /// Create a new HTTP client
    pub fn new(
        token_manager: Arc<TokenManager>,
        request_timeout: u64,
        connect_timeout: u64,
    ) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout))
            .timeout(Duration::from_secs(request_timeout))
            .build()?;

        Ok(Self::with_client(client, token_manager))
    }

    pub fn with_client(client: Client, token_manager: Arc<TokenManager>) -> Self {
        Self {
            client,
            token_manager,
        }
    }

    /// Authenticated GET
    pub async fn get(&self, url: &str) -> Result<Response> {
        self.send(self.client.get(url)).await
    }

    /// Attach the bearer header and send
    /// Non-2xx responses become [`AuthError::HttpStatus`]; nothing is retried
    pub async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let headers = self.token_manager.auth_header().await?;
        let response = request.headers(headers).send().await?;

        let status = response.status();
        tracing::debug!(status = %status, url = %response.url(), "Received HTTP response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Data API request failed");
            return Err(AuthError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    /// Get the underlying HTTP client
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn token_manager(&self) -> &Arc<TokenManager> {
        &self.token_manager
    }
}

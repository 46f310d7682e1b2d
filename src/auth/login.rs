// Login request logic

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;

use super::types::{Credentials, LoginRequest, LoginResponse};
use crate::error::{AuthError, Result};

/// Exchanges credentials for a token
///
/// The manager only talks to the network through this trait, so tests can
/// substitute a double that counts calls or returns canned failures.
#[async_trait]
pub trait LoginTransport: Send + Sync {
    /// POST the credentials to `url` and return the parsed success body
    async fn login(&self, url: &str, creds: &Credentials) -> Result<LoginResponse>;
}

/// Login transport backed by reqwest
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with request and connect timeouts in seconds
    pub fn new(request_timeout: u64, connect_timeout: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(request_timeout))
            .connect_timeout(Duration::from_secs(connect_timeout))
            .build()?;

        Ok(Self { client })
    }

    /// Wrap an existing client, sharing its connection pool
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LoginTransport for ReqwestTransport {
    async fn login(&self, url: &str, creds: &Credentials) -> Result<LoginResponse> {
        tracing::debug!(url = %url, "Sending login request");

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .json(&LoginRequest::from(creds))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), url = %url, "Login rejected");
            return Err(AuthError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        parse_login_response(&body)
    }
}

/// Parse a 2xx login body into its two expected fields
pub fn parse_login_response(body: &str) -> Result<LoginResponse> {
    serde_json::from_str(body).map_err(|e| {
        AuthError::MalformedResponse(format!("Failed to parse login response: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn transport() -> ReqwestTransport {
        ReqwestTransport::new(5, 5).unwrap()
    }

    #[test]
    fn test_parse_login_response() {
        let data = parse_login_response(r#"{"accessToken": "abc", "expiresIn": 3600}"#).unwrap();
        assert_eq!(data.access_token, "abc");
        assert_eq!(data.expires_in, 3600);
    }

    #[test]
    fn test_parse_login_response_missing_field() {
        let err = parse_login_response(r#"{"token": "abc"}"#).unwrap_err();
        assert!(matches!(err, AuthError::MalformedResponse(_)));
        assert!(err.to_string().contains("accessToken"));
    }

    #[tokio::test]
    async fn test_login_posts_json_credentials() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v2/auth/login")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "username": "username",
                "password": "password"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"accessToken": "test_token", "expiresIn": 36000}"#)
            .expect(1)
            .create_async()
            .await;

        let url = format!("{}/v2/auth/login", server.url());
        let creds = Credentials::new("username", "password");
        let data = transport().login(&url, &creds).await.unwrap();

        assert_eq!(data.access_token, "test_token");
        assert_eq!(data.expires_in, 36000);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_login_non_success_status() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/login")
            .with_status(401)
            .with_body("Invalid credentials")
            .expect(1)
            .create_async()
            .await;

        let url = format!("{}/auth/login", server.url());
        let creds = Credentials::new("username", "wrong");
        let err = transport().login(&url, &creds).await.unwrap_err();

        match err {
            AuthError::HttpStatus { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "Invalid credentials");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_login_malformed_success_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v2/auth/login")
            .with_status(200)
            .with_body(r#"{"accessToken": "test_token"}"#)
            .create_async()
            .await;

        let url = format!("{}/v2/auth/login", server.url());
        let creds = Credentials::new("username", "password");
        let err = transport().login(&url, &creds).await.unwrap_err();
        assert!(matches!(err, AuthError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_login_connection_refused() {
        // Port 1 is reserved and nothing listens on it
        let creds = Credentials::new("username", "password");
        let err = transport()
            .login("http://127.0.0.1:1/v2/auth/login", &creds)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Transport(_)));
    }
}

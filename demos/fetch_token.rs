//! Log in with credentials from the environment and print the auth header.
//!
//! ```sh
//! BAYES_USERNAME=... BAYES_PASSWORD=... cargo run --example fetch_token
//! ```

use anyhow::{Context, Result};
use bayes_auth::{AuthConfig, TokenManager};

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let config = AuthConfig::from_env().context("Failed to load configuration")?;
    let manager = TokenManager::from_config(&config)?;
    tracing::info!("Authenticating against {}", manager.auth_url());

    let token = manager.get_token().await.context("Login failed")?;
    println!("Token: {}...", &token[..12.min(token.len())]);

    if let Some(expires_at) = manager.expires_at().await {
        println!("Expires: {}", expires_at.to_rfc3339());
    }

    // Served from cache
    let headers = manager.auth_header().await?;
    println!("Header entries: {}", headers.len());

    Ok(())
}

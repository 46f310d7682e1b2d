// Bayes Auth - bearer token cache for the Bayes Esports API

pub mod auth;
pub mod config;
pub mod error;
pub mod http_client;

pub use auth::TokenManager;
pub use config::AuthConfig;
pub use error::{AuthError, Result};

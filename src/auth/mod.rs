// Authentication module
// Manages bearer token lifecycle against the Bayes login endpoint

mod clock;
mod login;
mod manager;
mod types;

pub use clock::{Clock, SystemClock};
pub use login::{parse_login_response, LoginTransport, ReqwestTransport};
pub use manager::{TokenManager, TokenManagerBuilder};
pub use types::{
    AuthEndpoint, CachedToken, Credentials, LoginResponse, TokenState, V1_AUTH_URL, V2_AUTH_URL,
};

// Re-export for testing
#[cfg(any(test, feature = "test-utils"))]
pub use clock::MockClock;

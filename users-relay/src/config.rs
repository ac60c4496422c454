// Configuration constants and environment helpers
use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};

// Target repository - centralized configuration
pub const GITHUB_REPO: &str = "dg143143/1";
pub const USERS_FILE_PATH: &str = "users.json";

// Server configuration
pub const SERVER_HOST: [u8; 4] = [0, 0, 0, 0];
pub const DEFAULT_PORT: u16 = 3000;

/// Immutable process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// GitHub personal access token; `None` when GITHUB_PAT is unset.
    pub github_token: Option<String>,
    pub port: u16,
}

impl RelayConfig {
    pub fn from_env() -> Self {
        RelayConfig {
            github_token: github_token(),
            port: server_port(),
        }
    }
}

/// Get the GitHub personal access token from the environment
pub fn github_token() -> Option<String> {
    std::env::var("GITHUB_PAT").ok().filter(|token| !token.is_empty())
}

/// Get the listening port from the environment
pub fn server_port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|port| port.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Create CORS layer permitting any origin
pub fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

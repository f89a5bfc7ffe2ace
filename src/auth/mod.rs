//! Authentication
//!
//! Two unrelated concerns live here:
//!
//! - [`auth::token`](crate::auth::token) caches OAuth2 client-credentials
//!   bearer tokens for outbound calls (agent runtime, tool gateway, Amadeus).
//! - [`auth::middleware`](crate::auth::middleware) protects the HTTP API with a
//!   single shared API key.
//!
//! # Configuration
//!
//! ```toml
//! [auth]
//! api_key_env = "UMRAH_API_KEY"
//!
//! [gateway.oauth]
//! token_endpoint = "https://example.auth.us-west-2.amazoncognito.com/oauth2/token"
//! client_id_env = "GATEWAY_CLIENT_ID"
//! client_secret_env = "GATEWAY_CLIENT_SECRET"
//! scope = "AmadeusGateway/invoke"
//! ```

/// Shared API key middleware for protected routes.
pub mod middleware;
/// OAuth2 client-credentials token cache.
pub mod token;

pub use middleware::require_api_key;
pub use token::{ClientCredentials, TokenCache};

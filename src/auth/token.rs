use crate::types::{AppError, Result};
use crate::utils::toml_config::{ClientAuthMethod, OAuthConfig};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

/// Lifetime assumed when the token endpoint omits `expires_in`.
const DEFAULT_EXPIRES_IN_SECS: i64 = 1799;
/// Tokens are refreshed this long before they actually expire.
const EXPIRY_MARGIN_SECS: i64 = 60;
/// Longest a token is cached, whatever `expires_in` claims.
const MAX_CACHE_SECS: i64 = 86_400;

/// Everything needed to request a client-credentials token.
#[derive(Clone)]
pub struct ClientCredentials {
    pub token_endpoint: String,
    pub client_id: String,
    pub client_secret: String,
    pub scope: Option<String>,
    pub method: ClientAuthMethod,
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("token_endpoint", &self.token_endpoint)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("scope", &self.scope)
            .field("method", &self.method)
            .finish()
    }
}

impl ClientCredentials {
    /// Resolve credentials from an `[*.oauth]` section, reading secrets from env.
    pub fn from_config(oauth: &OAuthConfig) -> Result<Self> {
        let read = |name: &str| {
            std::env::var(name).map_err(|_| {
                AppError::Configuration(format!("Environment variable '{}' is not set", name))
            })
        };

        Ok(Self {
            token_endpoint: oauth.token_endpoint.clone(),
            client_id: read(&oauth.client_id_env)?,
            client_secret: read(&oauth.client_secret_env)?,
            scope: oauth.scope.clone(),
            method: oauth.method,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<i64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// Caches one bearer token and refreshes it on expiry.
///
/// The mutex is held across the refresh request so concurrent callers wait
/// for a single token exchange instead of racing the endpoint.
pub struct TokenCache {
    credentials: ClientCredentials,
    http: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    pub fn new(credentials: ClientCredentials) -> Self {
        Self::with_client(credentials, reqwest::Client::new())
    }

    pub fn with_client(credentials: ClientCredentials, http: reqwest::Client) -> Self {
        Self {
            credentials,
            http,
            cached: Mutex::new(None),
        }
    }

    /// A valid access token, fetching a new one when the cached token expired.
    pub async fn bearer_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if Utc::now() < token.expires_at {
                return Ok(token.access_token.clone());
            }
        }

        let fresh = self.fetch_token().await?;
        let access_token = fresh.access_token.clone();
        *cached = Some(fresh);
        Ok(access_token)
    }

    /// Drop the cached token so the next call fetches a new one.
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }

    #[instrument(skip(self), fields(endpoint = %self.credentials.token_endpoint))]
    async fn fetch_token(&self) -> Result<CachedToken> {
        let creds = &self.credentials;

        let mut form: Vec<(&str, &str)> = vec![("grant_type", "client_credentials")];
        if let Some(scope) = creds.scope.as_deref() {
            form.push(("scope", scope));
        }

        let mut request = self.http.post(&creds.token_endpoint);
        match creds.method {
            ClientAuthMethod::Basic => {
                request = request.basic_auth(&creds.client_id, Some(&creds.client_secret));
            }
            ClientAuthMethod::Form => {
                form.push(("client_id", &creds.client_id));
                form.push(("client_secret", &creds.client_secret));
            }
        }

        let response = request
            .form(&form)
            .send()
            .await
            .map_err(|e| AppError::Auth(format!("Token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Auth(format!(
                "Token endpoint returned {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::Auth(format!("Invalid token response: {}", e)))?;

        let access_token = body
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Auth("Token response has no access_token".to_string()))?;

        let now = Utc::now();
        let lifetime = body
            .expires_in
            .unwrap_or(DEFAULT_EXPIRES_IN_SECS)
            .saturating_sub(EXPIRY_MARGIN_SECS)
            .clamp(0, MAX_CACHE_SECS);
        let expires_at = now + Duration::seconds(lifetime);

        debug!(expires_at = %expires_at, "Obtained access token");

        Ok(CachedToken {
            access_token,
            expires_at,
        })
    }
}

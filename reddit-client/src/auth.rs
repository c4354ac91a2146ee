use oauth2::basic::BasicClient;
use oauth2::reqwest::async_http_client;
use oauth2::{
    AuthUrl, ClientId, ClientSecret, ResourceOwnerPassword, ResourceOwnerUsername, TokenResponse,
    TokenUrl,
};
use pradon_core::RedditApiError;
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;
use tracing::debug;

const REDDIT_AUTH_URL: &str = "https://www.reddit.com/api/v1/authorize";
const REDDIT_TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";

// Refresh this long before the token actually expires.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: SystemTime,
    pub scope: Vec<String>,
}

impl RedditToken {
    pub fn is_expired(&self) -> bool {
        SystemTime::now() >= self.expires_at
    }

    pub fn needs_refresh(&self) -> bool {
        SystemTime::now() + TOKEN_REFRESH_MARGIN >= self.expires_at
    }
}

/// Script-app credentials for the password grant.
#[derive(Clone)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    pub user_agent: String,
}

/// Owns the OAuth2 password-grant flow and a cached token. Safe to share
/// across tasks; the first caller past the refresh margin re-runs the grant.
pub struct Authenticator {
    oauth: BasicClient,
    credentials: RedditCredentials,
    token: RwLock<Option<RedditToken>>,
}

impl Authenticator {
    pub fn new(credentials: RedditCredentials) -> Result<Self, RedditApiError> {
        let auth_url = AuthUrl::new(REDDIT_AUTH_URL.to_string()).map_err(|e| {
            RedditApiError::AuthenticationFailed {
                reason: format!("invalid auth URL: {}", e),
            }
        })?;
        let token_url = TokenUrl::new(REDDIT_TOKEN_URL.to_string()).map_err(|e| {
            RedditApiError::AuthenticationFailed {
                reason: format!("invalid token URL: {}", e),
            }
        })?;

        let oauth = BasicClient::new(
            ClientId::new(credentials.client_id.clone()),
            Some(ClientSecret::new(credentials.client_secret.clone())),
            auth_url,
            Some(token_url),
        );

        Ok(Self {
            oauth,
            credentials,
            token: RwLock::new(None),
        })
    }

    /// Returns a valid access token, running the password grant when the
    /// cached one is missing or near expiry.
    pub async fn access_token(&self) -> Result<String, RedditApiError> {
        {
            let token = self.token.read().await;
            if let Some(token) = token.as_ref() {
                if !token.needs_refresh() {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let fresh = self.exchange_password().await?;
        let access_token = fresh.access_token.clone();
        *self.token.write().await = Some(fresh);
        Ok(access_token)
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .await
            .as_ref()
            .map(|token| !token.is_expired())
            .unwrap_or(false)
    }

    pub async fn set_token(&self, token: RedditToken) {
        *self.token.write().await = Some(token);
    }

    async fn exchange_password(&self) -> Result<RedditToken, RedditApiError> {
        debug!("Requesting access token via password grant");

        // Reddit rejects token requests carrying a default library UA.
        let user_agent = oauth2::http::HeaderValue::from_str(&self.credentials.user_agent)
            .map_err(|_| RedditApiError::AuthenticationFailed {
                reason: "user agent is not a valid header value".to_string(),
            })?;

        let response = self
            .oauth
            .exchange_password(
                &ResourceOwnerUsername::new(self.credentials.username.clone()),
                &ResourceOwnerPassword::new(self.credentials.password.clone()),
            )
            .request_async(move |mut request: oauth2::HttpRequest| {
                request
                    .headers
                    .insert(oauth2::http::header::USER_AGENT, user_agent);
                async_http_client(request)
            })
            .await
            .map_err(|e| RedditApiError::AuthenticationFailed {
                reason: e.to_string(),
            })?;

        let expires_in = response
            .expires_in()
            .unwrap_or(Duration::from_secs(3600));
        let scope = response
            .scopes()
            .map(|scopes| scopes.iter().map(|s| s.to_string()).collect())
            .unwrap_or_default();

        Ok(RedditToken {
            access_token: response.access_token().secret().clone(),
            refresh_token: response.refresh_token().map(|t| t.secret().clone()),
            expires_at: SystemTime::now() + expires_in,
            scope,
        })
    }
}

//! Authentication configuration.
//!
//! Secrets are redacted in Debug output to prevent accidental exposure in
//! logs.

use std::sync::Arc;

use exh_client::{Error, ErrorKind, Result, AUTH_BASE};

use crate::credentials::OAuth2TokenData;

/// Environment variable holding the OAuth1 consumer key.
pub const CONSUMER_KEY_ENV: &str = "EXH_CONSUMER_KEY";
/// Environment variable holding the OAuth1 consumer secret.
pub const CONSUMER_SECRET_ENV: &str = "EXH_CONSUMER_SECRET";
/// Environment variable holding the OAuth2 client id.
pub const CLIENT_ID_ENV: &str = "EXH_CLIENT_ID";
/// Environment variable holding the OAuth2 client secret.
pub const CLIENT_SECRET_ENV: &str = "EXH_CLIENT_SECRET";

/// Called with the new token data every time OAuth2 tokens are obtained.
pub type FreshTokensCallback = Arc<dyn Fn(&OAuth2TokenData) + Send + Sync>;

/// Which credential strategy a client binds to.
#[derive(Debug, Clone)]
pub enum AuthConfig {
    OAuth1(OAuth1Config),
    OAuth2(OAuth2Config),
    /// Authorization is injected upstream; no local credentials.
    Proxy,
}

impl AuthConfig {
    /// Shorthand for an OAuth1 configuration with the default token path.
    pub fn oauth1(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        AuthConfig::OAuth1(OAuth1Config::new(consumer_key, consumer_secret))
    }

    /// Shorthand for a public OAuth2 client with the default token path.
    pub fn oauth2(client_id: impl Into<String>) -> Self {
        AuthConfig::OAuth2(OAuth2Config::new(client_id))
    }

    /// Pick a configuration from the environment.
    ///
    /// `EXH_CONSUMER_KEY`/`EXH_CONSUMER_SECRET` select OAuth1,
    /// `EXH_CLIENT_ID` (plus optional `EXH_CLIENT_SECRET`) selects OAuth2,
    /// and the absence of both selects proxy mode.
    pub fn from_env() -> Result<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        match (var(CONSUMER_KEY_ENV), var(CONSUMER_SECRET_ENV)) {
            (Some(key), Some(secret)) => return Ok(AuthConfig::oauth1(key, secret)),
            (Some(_), None) => {
                return Err(Error::new(ErrorKind::Config(format!(
                    "{CONSUMER_KEY_ENV} is set but {CONSUMER_SECRET_ENV} is not"
                ))))
            }
            _ => {}
        }

        if let Some(client_id) = var(CLIENT_ID_ENV) {
            let mut config = OAuth2Config::new(client_id);
            if let Some(secret) = var(CLIENT_SECRET_ENV) {
                config = config.with_secret(secret);
            }
            return Ok(AuthConfig::OAuth2(config));
        }

        Ok(AuthConfig::Proxy)
    }
}

/// OAuth1 consumer configuration.
#[derive(Clone)]
pub struct OAuth1Config {
    pub consumer_key: String,
    consumer_secret: String,
    /// Token endpoint path, relative to the host.
    pub token_path: String,
}

impl std::fmt::Debug for OAuth1Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuth1Config")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"[REDACTED]")
            .field("token_path", &self.token_path)
            .finish()
    }
}

impl OAuth1Config {
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            token_path: format!("{AUTH_BASE}/oauth1/tokens"),
        }
    }

    /// Override the token endpoint path.
    pub fn with_token_path(mut self, path: impl Into<String>) -> Self {
        self.token_path = path.into();
        self
    }

    pub(crate) fn consumer_secret(&self) -> &str {
        &self.consumer_secret
    }
}

/// OAuth2 client configuration.
///
/// Clients with a secret are confidential and authenticate to the token
/// endpoint with HTTP Basic; public clients send `client_id` in the body.
#[derive(Clone)]
pub struct OAuth2Config {
    pub client_id: String,
    client_secret: Option<String>,
    /// Token endpoint path, relative to the host.
    pub token_path: String,
    fresh_tokens_callback: Option<FreshTokensCallback>,
}

impl std::fmt::Debug for OAuth2Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuth2Config")
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("token_path", &self.token_path)
            .field(
                "fresh_tokens_callback",
                &self.fresh_tokens_callback.as_ref().map(|_| "Fn"),
            )
            .finish()
    }
}

impl OAuth2Config {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: None,
            token_path: format!("{AUTH_BASE}/oauth2/tokens"),
            fresh_tokens_callback: None,
        }
    }

    /// Set the client secret, making this a confidential client.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(secret.into());
        self
    }

    /// Override the token endpoint path.
    pub fn with_token_path(mut self, path: impl Into<String>) -> Self {
        self.token_path = path.into();
        self
    }

    /// Register a callback receiving every freshly obtained token set.
    pub fn with_fresh_tokens_callback(
        mut self,
        callback: impl Fn(&OAuth2TokenData) + Send + Sync + 'static,
    ) -> Self {
        self.fresh_tokens_callback = Some(Arc::new(callback));
        self
    }

    pub fn is_confidential(&self) -> bool {
        self.client_secret.is_some()
    }

    pub(crate) fn client_secret(&self) -> Option<&str> {
        self.client_secret.as_deref()
    }

    pub(crate) fn fresh_tokens_callback(&self) -> Option<&FreshTokensCallback> {
        self.fresh_tokens_callback.as_ref()
    }
}

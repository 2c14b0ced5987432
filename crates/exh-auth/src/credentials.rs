//! Token data held by the credential strategies.
//!
//! All token types implement custom Debug to redact sensitive data.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Tokens obtained from the OAuth2 token endpoint.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OAuth2TokenData {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Access token lifetime in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    /// Absolute expiry, derived from `expires_in` when tokens are received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
}

impl std::fmt::Debug for OAuth2TokenData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuth2TokenData")
            .field("access_token", &"[REDACTED]")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("expires_in", &self.expires_in)
            .field("expires_at", &self.expires_at)
            .field("token_type", &self.token_type)
            .field("user_id", &self.user_id)
            .field("application_id", &self.application_id)
            .finish()
    }
}

impl OAuth2TokenData {
    /// Token data holding only an access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            expires_in: None,
            expires_at: None,
            token_type: None,
            user_id: None,
            application_id: None,
        }
    }

    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Fill `expires_at` from `expires_in`, relative to `now`.
    pub(crate) fn stamp_expiry(mut self, now: DateTime<Utc>) -> Self {
        if self.expires_at.is_none() {
            self.expires_at = self.expires_in.map(|secs| now + Duration::seconds(secs));
        }
        self
    }

    /// Returns true if the access token is known to have expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Utc::now())
    }
}

/// OAuth1 access token pair.
#[derive(Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OAuth1TokenData {
    /// Token key (`token` on the wire).
    pub key: String,
    /// Token secret (`tokenSecret` on the wire).
    pub secret: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    /// Identifier of the token record, used to revoke it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
}

impl std::fmt::Debug for OAuth1TokenData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuth1TokenData")
            .field("key", &"[REDACTED]")
            .field("secret", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .field("application_id", &self.application_id)
            .field("token_id", &self.token_id)
            .finish()
    }
}

impl OAuth1TokenData {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
            user_id: None,
            application_id: None,
            token_id: None,
        }
    }
}

/// Token endpoint response body for OAuth1, after normalization.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OAuth1TokenResponse {
    token: String,
    token_secret: String,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    application_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
}

impl From<OAuth1TokenResponse> for OAuth1TokenData {
    fn from(resp: OAuth1TokenResponse) -> Self {
        Self {
            key: resp.token,
            secret: resp.token_secret,
            user_id: resp.user_id,
            application_id: resp.application_id,
            token_id: resp.id,
        }
    }
}

/// Token data returned by `authenticate` and `confirm_mfa`.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenData {
    OAuth1(OAuth1TokenData),
    OAuth2(OAuth2TokenData),
}

impl TokenData {
    pub fn user_id(&self) -> Option<&str> {
        match self {
            TokenData::OAuth1(data) => data.user_id.as_deref(),
            TokenData::OAuth2(data) => data.user_id.as_deref(),
        }
    }

    pub fn as_oauth1(&self) -> Option<&OAuth1TokenData> {
        match self {
            TokenData::OAuth1(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_oauth2(&self) -> Option<&OAuth2TokenData> {
        match self {
            TokenData::OAuth2(data) => Some(data),
            _ => None,
        }
    }
}

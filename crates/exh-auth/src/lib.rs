//! # exh-auth
//!
//! Authenticated transport for the ExH platform.
//!
//! ## Security
//!
//! - Sensitive data (tokens, secrets, passwords, MFA codes) are redacted in Debug output
//! - Tracing/logging skips credential parameters
//! - Error messages sanitize any credential data
//!
//! ## Supported Authentication Methods
//!
//! - **OAuth1** - HMAC-SHA1 signed requests, password or existing token pair
//! - **OAuth2** - Password, authorization code and refresh token grants, with
//!   transparent refresh-and-retry on expired access tokens
//! - **Proxy** - No local credentials; authorization is injected upstream
//!
//! Both OAuth flavours support MFA challenges through `confirm_mfa`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use exh_auth::{AuthClient, AuthConfig, OAuth2Grant};
//! use exh_client::{ApiErrorKind, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), exh_client::Error> {
//!     let config = ClientConfig::from_env()?;
//!     let client = AuthClient::from_config(config, AuthConfig::oauth2("my-client-id"))?;
//!
//!     match client.authenticate(OAuth2Grant::password("jane@example.com", "secret")).await {
//!         Err(err) if err.is(ApiErrorKind::MfaRequired) => {
//!             let challenge = err.api().and_then(|e| e.mfa_challenge());
//!             // prompt for a code, then client.confirm_mfa(..)
//!         }
//!         other => { other?; }
//!     }
//!
//!     let me: serde_json::Value = client.get_json("/users/v1/me").await?;
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod credentials;
mod grant;
mod oauth1;
mod oauth2;
mod proxy;

pub use client::AuthClient;
pub use config::{
    AuthConfig, FreshTokensCallback, OAuth1Config, OAuth2Config, CLIENT_ID_ENV,
    CLIENT_SECRET_ENV, CONSUMER_KEY_ENV, CONSUMER_SECRET_ENV,
};
pub use credentials::{OAuth1TokenData, OAuth2TokenData, TokenData};
pub use grant::{AuthParams, MfaConfirmation, OAuth1Login, OAuth2Grant};
pub use oauth1::OAuth1Signer;

//! # exh-sdk
//!
//! A typed Rust client for the ExH platform APIs.
//!
//! This library provides typed access to the platform's services with
//! pluggable authentication, transparent token refresh and a single error
//! taxonomy.
//!
//! ## Security
//!
//! - Sensitive data (tokens, secrets, passwords) are redacted in Debug output
//! - Tracing/logging skips credential parameters
//! - Error messages sanitize any credential data
//!
//! ## Crates
//!
//! - **exh-client** - HTTP sender, request descriptors, error classifier, response normalizer
//! - **exh-auth** - OAuth1 signing, OAuth2 grants with refresh-and-retry, proxy mode
//! - **exh-services** - Users, data documents, files and auth administration facades
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use exh_sdk::{AuthConfig, Client, ClientConfig, OAuth2Grant};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), exh_sdk::Error> {
//!     let client = Client::new(
//!         ClientConfig::from_env()?,
//!         AuthConfig::oauth2("my-client-id"),
//!     )?;
//!
//!     client
//!         .authenticate(OAuth2Grant::password("jane@example.com", "secret"))
//!         .await?;
//!
//!     let me = client.users().me().await?;
//!     println!("hello {}", me.first_name.unwrap_or_default());
//!     Ok(())
//! }
//! ```

#[cfg(feature = "services")]
mod facade;

#[cfg(feature = "client")]
pub use exh_client as client;

#[cfg(feature = "auth")]
pub use exh_auth as auth;

#[cfg(feature = "services")]
pub use exh_services as services;

#[cfg(feature = "client")]
pub use exh_client::{ApiError, ApiErrorKind, ClientConfig, Error, ErrorKind, Request, Result};

#[cfg(feature = "auth")]
pub use exh_auth::{
    AuthClient, AuthConfig, MfaConfirmation, OAuth1Config, OAuth1Login, OAuth2Config,
    OAuth2Grant, TokenData,
};

#[cfg(feature = "services")]
pub use facade::Client;

//! # exh-client
//!
//! Core HTTP client infrastructure for the ExH platform APIs.
//!
//! This crate provides the unauthenticated half of the SDK transport:
//! - Request descriptors with a one-shot retry marker
//! - An HTTP sender that stamps the `X-User-Agent` header on every call
//! - The error classifier mapping server error codes to a typed taxonomy
//! - The response normalizer (camelCase keys, timestamps, field renames)
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Service Facades                          │
//! │  (users, data, files, auth)                                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   AuthClient (exh-auth)                     │
//! │  - Attaches OAuth1 / OAuth2 / proxy credentials             │
//! │  - Refresh-and-retry on expired access tokens               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    HttpClient                               │
//! │  - Raw HTTP dispatch                                        │
//! │  - Pipeline: classify failures, normalize successes         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use exh_client::{ClientConfig, HttpClient, Request};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), exh_client::Error> {
//!     let config = ClientConfig::builder("https://api.dev.example.com").build()?;
//!     let http = HttpClient::new(config)?;
//!
//!     let response = http.execute(Request::get("/users/v1/health")).await?;
//!     assert!(response.is_success());
//!     Ok(())
//! }
//! ```

mod classify;
mod client;
mod config;
mod error;
mod normalize;
mod request;
mod response;
mod sanitize;

pub use classify::{classify, kind_for_code, kind_for_error};
pub use client::HttpClient;
pub use config::{ClientConfig, ClientConfigBuilder, HOST_ENV};
pub use error::{
    ApiError, ApiErrorKind, Error, ErrorCategory, ErrorKind, MfaChallenge, MfaMethod, Result,
};
pub use normalize::{NormalizeStage, Normalizer, TIMESTAMP_FIELDS};
pub use request::{Request, RequestBody, RequestMethod, ResponseType};
pub use response::{Response, ResponseBody};

/// Base path of the authentication service.
pub const AUTH_BASE: &str = "/auth/v2";

/// Base path of the users service.
pub const USERS_BASE: &str = "/users/v1";

/// Base path of the data service. Document payloads below it are user-defined.
pub const DATA_BASE: &str = "/data/v1";

/// Base path of the files service.
pub const FILES_BASE: &str = "/files/v1";

/// Value of the `X-User-Agent` header sent with every request.
pub const USER_AGENT: &str = concat!("exh-sdk-rust/", env!("CARGO_PKG_VERSION"));

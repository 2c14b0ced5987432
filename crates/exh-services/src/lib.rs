//! # exh-services
//!
//! Typed facades over the ExH platform services.
//!
//! ## Services
//!
//! - **Users** - Health check, current user, lookup, update, RQL search and bulk removal
//! - **Data** - Schemas and their documents: CRUD, field removal, transitions, access links
//! - **Files** - File listing, details, download and removal
//! - **Auth** - Applications, issued OAuth1 tokens and MFA settings
//!
//! Every facade wraps a shared [`exh_auth::AuthClient`], so credentials,
//! refresh-and-retry and error classification apply uniformly.
//!
//! ## Example
//!
//! ```rust,ignore
//! use exh_services::DataService;
//!
//! let data = DataService::new(auth_client);
//! let page = data
//!     .find_documents::<serde_json::Map<_, _>>("5a0b2adc265ced65a8cab865", "limit(10)")
//!     .await?;
//! ```

pub mod auth;
mod client;
mod common;
pub mod data;
pub mod files;
pub mod users;

pub use client::{AuthService, DataService, FilesService, UsersService};
pub use common::{AffectedRecords, Page, PagedResult};
pub use data::{Document, Schema, SchemaInput, Transition};
pub use exh_client::{Error, Result};
pub use files::FileDetails;
pub use users::{User, UserUpdate};

//! # forcekit-client
//!
//! Core HTTP transport for Salesforce APIs.
//!
//! This crate provides the authenticated client the API surfaces build on:
//! - Session storage shared across clones, with transparent re-login
//! - Typed JSON dispatch (decode into any `Deserialize` target)
//! - Structured API error extraction from response bodies
//! - Compression support (gzip, deflate)
//! - Connection pooling
//! - Request/response tracing
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Application Layer                        │
//! │                  (forcekit-rest, forcekit-bulk)             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       ForceClient                           │
//! │  - Holds session + optional authenticator                   │
//! │  - Typed verbs (get, post, patch, delete) and raw send      │
//! │  - Decodes bodies, probes the API error shape               │
//! │  - Replays once after an expired-session response           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Success and failure are both carried in response bodies more often than in
//! status codes, so dispatch never branches on the status alone (204 aside):
//! the target type is decoded first, and only a body that fails that decode is
//! probed for the error collection shape.
//!
//! ## Example
//!
//! ```rust,ignore
//! use forcekit_auth::Credentials;
//! use forcekit_client::ForceClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), forcekit_client::Error> {
//!     let creds = Credentials::password("key", "secret", "user@example.com", "pw", "sectoken");
//!     let client = ForceClient::login(creds).await?;
//!
//!     let limits: Option<serde_json::Value> = client
//!         .get("/services/data/v62.0/limits", &[])
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod request;

pub use client::ForceClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{ApiError, ApiErrors, Error, ErrorKind, Result, INVALID_SESSION_ID};
pub use request::{ApiRequest, Body, Method};

// Re-exported so API surfaces can name sessions without a direct
// forcekit-auth dependency.
pub use forcekit_auth::Session;

/// Default Salesforce API version
pub const DEFAULT_API_VERSION: &str = "62.0";

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("forcekit/", env!("CARGO_PKG_VERSION"));

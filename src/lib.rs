//! # forcekit
//!
//! A Salesforce API client library for Rust.
//!
//! This library provides type-safe access to the Salesforce REST and Bulk
//! APIs with built-in authentication, session refresh, and error handling.
//!
//! ## Security
//!
//! This library is designed with security in mind:
//! - Sensitive data (tokens, secrets) are redacted in Debug output
//! - Tracing/logging skips credential parameters
//! - Error messages sanitize any credential data
//!
//! ## Crates
//!
//! - **forcekit-client** - Core HTTP transport: typed dispatch, API error decoding, session refresh
//! - **forcekit-auth** - Authentication: OAuth 2.0 password, refresh token and JWT bearer grants
//! - **forcekit-rest** - REST API: CRUD, SOQL query, describe metadata, search, composite
//! - **forcekit-bulk** - Bulk API: asynchronous jobs and batches for large data sets
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use forcekit::auth::Credentials;
//! use forcekit::rest::{Account, RestClient};
//! use forcekit::ForceClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Authenticate with the username-password grant
//!     let creds = Credentials::password(
//!         "consumer-key",
//!         "consumer-secret",
//!         "user@example.com",
//!         "password",
//!         "security-token",
//!     );
//!     let client = ForceClient::login(creds).await?;
//!
//!     // Discover API resources, then query
//!     let rest = RestClient::connect(client).await?;
//!     let accounts = rest
//!         .query::<Account>("SELECT Id, Name FROM Account LIMIT 10")
//!         .await?;
//!
//!     for account in accounts.records {
//!         println!("{}", account.system.name);
//!     }
//!
//!     Ok(())
//! }
//! ```

// Re-export all crates for convenient access
pub use forcekit_auth as auth;
pub use forcekit_bulk as bulk;
pub use forcekit_client as client;
pub use forcekit_rest as rest;

// Re-export commonly used types at the top level
pub use forcekit_auth::{Credentials, Session};
pub use forcekit_bulk::BulkClient;
pub use forcekit_client::{ClientConfig, ForceClient};
pub use forcekit_rest::RestClient;

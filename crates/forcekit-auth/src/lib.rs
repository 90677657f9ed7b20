//! # forcekit-auth
//!
//! Salesforce authentication for the forcekit client stack.
//!
//! Supported OAuth 2.0 grants:
//!
//! - **Password** (username + password + security token) for trusted integrations
//! - **Refresh token** for previously authorized connected apps
//! - **JWT bearer** for server-to-server integration with a certificate
//!
//! All flows post to `{login_url}/services/oauth2/token` and yield a [`Session`]
//! (bearer token + instance URL). Failures from the token endpoint are surfaced
//! verbatim as [`ErrorKind::OAuth`] so callers can distinguish credential
//! problems from network problems.
//!
//! ## Security
//!
//! - Tokens, passwords and keys are redacted in Debug output
//! - Tracing spans skip credential parameters
//! - Sessions are held in memory only, never persisted
//!
//! ## Example
//!
//! ```rust,ignore
//! use forcekit_auth::{Authenticator, Credentials};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), forcekit_auth::Error> {
//!     let creds = Credentials::password(
//!         "consumer_key",
//!         "consumer_secret",
//!         "user@example.com",
//!         "password",
//!         "security_token",
//!     );
//!     let session = Authenticator::new(creds).authenticate().await?;
//!     println!("logged in to {}", session.instance_url());
//!     Ok(())
//! }
//! ```

mod credentials;
mod error;
mod jwt;
mod oauth;
mod session;

pub use credentials::{Credentials, Environment, Grant};
pub use error::{Error, ErrorKind, Result};
pub use oauth::{Authenticator, TokenResponse};
pub use session::Session;

/// Default Salesforce login URL for production.
pub const PRODUCTION_LOGIN_URL: &str = "https://login.salesforce.com";

/// Default Salesforce login URL for sandbox.
pub const SANDBOX_LOGIN_URL: &str = "https://test.salesforce.com";

//! Connected-app credentials and login environments.
//!
//! All credential types implement custom Debug to redact sensitive data.

use crate::error::{Error, ErrorKind, Result};

/// Which login host the token request is sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// `https://login.salesforce.com`
    Production,
    /// `https://test.salesforce.com`
    Sandbox,
    /// A custom login host (scratch org, mock server).
    Custom(String),
}

impl Environment {
    /// The login URL for this environment, without a trailing slash.
    pub fn login_url(&self) -> &str {
        match self {
            Environment::Production => crate::PRODUCTION_LOGIN_URL,
            Environment::Sandbox => crate::SANDBOX_LOGIN_URL,
            Environment::Custom(url) => url.trim_end_matches('/'),
        }
    }
}

/// The OAuth 2.0 grant used to obtain a session.
#[derive(Clone)]
pub enum Grant {
    /// Resource-owner password grant. The security token is appended to the
    /// password on the wire, per Salesforce convention.
    Password {
        username: String,
        password: String,
        security_token: String,
    },
    /// Refresh-token grant for a previously authorized connected app.
    RefreshToken { refresh_token: String },
    /// JWT bearer grant signed with the connected app's RSA private key (PEM).
    JwtBearer {
        username: String,
        private_key: Vec<u8>,
    },
}

impl std::fmt::Debug for Grant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Grant::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .field("security_token", &"[REDACTED]")
                .finish(),
            Grant::RefreshToken { .. } => f
                .debug_struct("RefreshToken")
                .field("refresh_token", &"[REDACTED]")
                .finish(),
            Grant::JwtBearer { username, .. } => f
                .debug_struct("JwtBearer")
                .field("username", username)
                .field("private_key", &"[REDACTED]")
                .finish(),
        }
    }
}

/// Connected-app credentials: consumer key/secret plus one grant.
///
/// Secrets are redacted in Debug output.
#[derive(Clone)]
pub struct Credentials {
    consumer_key: String,
    consumer_secret: String,
    grant: Grant,
    environment: Environment,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"[REDACTED]")
            .field("grant", &self.grant)
            .field("environment", &self.environment)
            .finish()
    }
}

impl Credentials {
    /// Credentials for the password grant.
    pub fn password(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        security_token: impl Into<String>,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            grant: Grant::Password {
                username: username.into(),
                password: password.into(),
                security_token: security_token.into(),
            },
            environment: Environment::Production,
        }
    }

    /// Credentials for the refresh-token grant.
    pub fn refresh_token(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            grant: Grant::RefreshToken {
                refresh_token: refresh_token.into(),
            },
            environment: Environment::Production,
        }
    }

    /// Credentials for the JWT bearer grant with an in-memory PEM key.
    pub fn jwt_bearer(
        consumer_key: impl Into<String>,
        username: impl Into<String>,
        private_key: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: String::new(),
            grant: Grant::JwtBearer {
                username: username.into(),
                private_key: private_key.into(),
            },
            environment: Environment::Production,
        }
    }

    /// Credentials for the JWT bearer grant, loading the PEM key from a file.
    pub fn jwt_bearer_from_file(
        consumer_key: impl Into<String>,
        username: impl Into<String>,
        key_path: impl AsRef<std::path::Path>,
    ) -> Result<Self> {
        let private_key = std::fs::read(key_path.as_ref())?;
        Ok(Self::jwt_bearer(consumer_key, username, private_key))
    }

    /// Direct the token request at the sandbox login host.
    pub fn sandbox(mut self) -> Self {
        self.environment = Environment::Sandbox;
        self
    }

    /// Direct the token request at a custom login host.
    pub fn with_login_url(mut self, url: impl Into<String>) -> Self {
        self.environment = Environment::Custom(url.into());
        self
    }

    /// The consumer key (client_id) of the connected app.
    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    /// The consumer secret (client_secret) of the connected app.
    pub fn consumer_secret(&self) -> &str {
        &self.consumer_secret
    }

    /// The configured grant.
    pub fn grant(&self) -> &Grant {
        &self.grant
    }

    /// The login environment.
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// The resolved login URL.
    pub fn login_url(&self) -> &str {
        self.environment.login_url()
    }

    /// Check that every field the configured grant needs is present.
    pub fn validate(&self) -> Result<()> {
        if self.consumer_key.is_empty() {
            return Err(Error::new(ErrorKind::InvalidCredentials(
                "consumer key is empty".to_string(),
            )));
        }
        match &self.grant {
            Grant::Password {
                username, password, ..
            } => {
                if username.is_empty() || password.is_empty() {
                    return Err(Error::new(ErrorKind::InvalidCredentials(
                        "username and password are required for the password grant".to_string(),
                    )));
                }
            }
            Grant::RefreshToken { refresh_token } => {
                if refresh_token.is_empty() {
                    return Err(Error::new(ErrorKind::InvalidCredentials(
                        "refresh token is empty".to_string(),
                    )));
                }
            }
            Grant::JwtBearer {
                username,
                private_key,
            } => {
                if username.is_empty() || private_key.is_empty() {
                    return Err(Error::new(ErrorKind::InvalidCredentials(
                        "username and private key are required for the JWT bearer grant"
                            .to_string(),
                    )));
                }
            }
        }
        Ok(())
    }
}

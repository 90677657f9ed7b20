//! The token-endpoint client that turns credentials into sessions.

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::credentials::{Credentials, Grant};
use crate::error::{Error, ErrorKind, Result};
use crate::jwt;
use crate::session::Session;

/// Successful response from the token endpoint.
///
/// Tokens are redacted in Debug output.
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub instance_url: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub issued_at: String,
    #[serde(default)]
    pub signature: String,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[REDACTED]")
            .field("instance_url", &self.instance_url)
            .field("id", &self.id)
            .field("token_type", &self.token_type)
            .field("issued_at", &self.issued_at)
            .finish_non_exhaustive()
    }
}

impl From<TokenResponse> for Session {
    fn from(token: TokenResponse) -> Self {
        Session::from_parts(
            token.access_token,
            token.instance_url,
            token.id,
            token.issued_at,
            token.signature,
        )
    }
}

/// Error response from the token endpoint.
#[derive(Debug, Deserialize)]
struct OAuthErrorResponse {
    error: String,
    #[serde(default)]
    error_description: String,
}

/// Performs OAuth 2.0 grants against the Salesforce token endpoint.
///
/// One authenticator serves one set of credentials; the owning client calls
/// [`Authenticator::authenticate`] both for the initial login and for the
/// single re-authentication replay after a session expires.
#[derive(Clone)]
pub struct Authenticator {
    credentials: Credentials,
    http: reqwest::Client,
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl Authenticator {
    /// Create an authenticator with its own HTTP client.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            http: reqwest::Client::new(),
        }
    }

    /// Create an authenticator that reuses an existing HTTP client.
    pub fn with_http_client(credentials: Credentials, http: reqwest::Client) -> Self {
        Self { credentials, http }
    }

    /// The credentials this authenticator holds.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Perform the configured grant and return a fresh session.
    ///
    /// A failure from the token endpoint surfaces the OAuth error body verbatim
    /// as [`ErrorKind::OAuth`]; it is never retried here, since replaying a bad
    /// credential would loop.
    #[instrument(skip(self))]
    pub async fn authenticate(&self) -> Result<Session> {
        self.credentials.validate()?;

        let token = match self.credentials.grant() {
            Grant::Password {
                username,
                password,
                security_token,
            } => {
                // Salesforce expects the security token appended to the password.
                let combined = format!("{password}{security_token}");
                self.post_token_form(&[
                    ("grant_type", "password"),
                    ("client_id", self.credentials.consumer_key()),
                    ("client_secret", self.credentials.consumer_secret()),
                    ("username", username),
                    ("password", &combined),
                ])
                .await?
            }
            Grant::RefreshToken { refresh_token } => {
                self.post_token_form(&[
                    ("grant_type", "refresh_token"),
                    ("client_id", self.credentials.consumer_key()),
                    ("client_secret", self.credentials.consumer_secret()),
                    ("refresh_token", refresh_token),
                ])
                .await?
            }
            Grant::JwtBearer {
                username,
                private_key,
            } => {
                let assertion = jwt::bearer_assertion(
                    self.credentials.consumer_key(),
                    username,
                    self.credentials.login_url(),
                    private_key,
                )?;
                self.post_token_form(&[
                    ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                    ("assertion", &assertion),
                ])
                .await?
            }
        };

        debug!(instance_url = %token.instance_url, "authenticated");
        Ok(token.into())
    }

    /// POST a form to the token endpoint and interpret the response.
    async fn post_token_form(&self, params: &[(&str, &str)]) -> Result<TokenResponse> {
        // client_secret is optional for some connected apps; skip it when empty
        // so the endpoint does not reject the form.
        let params: Vec<(&str, &str)> = params
            .iter()
            .copied()
            .filter(|(key, value)| *key != "client_secret" || !value.is_empty())
            .collect();
        let body = serde_urlencoded::to_string(&params)?;

        let response = self
            .http
            .post(format!(
                "{}/services/oauth2/token",
                self.credentials.login_url()
            ))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let error: OAuthErrorResponse = response.json().await?;
            return Err(Error::new(ErrorKind::OAuth {
                error: error.error,
                description: error.error_description,
            }));
        }

        let token: TokenResponse = response.json().await?;
        Ok(token)
    }
}

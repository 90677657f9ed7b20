//! JWT bearer assertion signing.

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;

use crate::error::Result;

/// Claims for the Salesforce JWT bearer grant.
#[derive(Debug, Serialize)]
struct BearerClaims<'a> {
    /// Issuer: the connected app's consumer key.
    iss: &'a str,
    /// Subject: the username to authenticate as.
    sub: &'a str,
    /// Audience: the login URL the assertion is presented to.
    aud: &'a str,
    /// Expiration (Unix timestamp).
    exp: i64,
    /// Issued-at (Unix timestamp).
    iat: i64,
}

/// Assertion lifetime. Salesforce rejects assertions valid longer than a few minutes.
const ASSERTION_LIFETIME_MINUTES: i64 = 3;

/// Sign an RS256 bearer assertion with the connected app's private key (PEM).
pub(crate) fn bearer_assertion(
    consumer_key: &str,
    username: &str,
    audience: &str,
    private_key_pem: &[u8],
) -> Result<String> {
    let now = Utc::now();
    let claims = BearerClaims {
        iss: consumer_key,
        sub: username,
        aud: audience,
        exp: (now + Duration::minutes(ASSERTION_LIFETIME_MINUTES)).timestamp(),
        iat: now.timestamp(),
    };

    let header = Header::new(Algorithm::RS256);
    let key = EncodingKey::from_rsa_pem(private_key_pem)?;
    let token = encode(&header, &claims, &key)?;
    Ok(token)
}

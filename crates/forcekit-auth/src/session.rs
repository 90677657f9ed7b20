//! The session snapshot produced by a successful grant.

/// An authenticated Salesforce session: bearer token plus the org's instance URL.
///
/// Mutated in place by the owning client when it re-authenticates; never
/// persisted by this library. The access token is redacted in Debug output.
#[derive(Clone, Default)]
pub struct Session {
    access_token: String,
    instance_url: String,
    id: String,
    issued_at: String,
    signature: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field("instance_url", &self.instance_url)
            .field("id", &self.id)
            .field("issued_at", &self.issued_at)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Build a session from a token and instance URL obtained elsewhere
    /// (an existing integration, a CLI, a test fixture).
    pub fn new(instance_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            instance_url: instance_url.into(),
            id: String::new(),
            issued_at: String::new(),
            signature: String::new(),
        }
    }

    pub(crate) fn from_parts(
        access_token: String,
        instance_url: String,
        id: String,
        issued_at: String,
        signature: String,
    ) -> Self {
        Self {
            access_token,
            instance_url,
            id,
            issued_at,
            signature,
        }
    }

    /// The bearer access token.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// The org's instance base URL.
    pub fn instance_url(&self) -> &str {
        self.instance_url.trim_end_matches('/')
    }

    /// The identity URL returned by the token endpoint, when present.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Token issue timestamp (epoch milliseconds as reported by the server).
    pub fn issued_at(&self) -> &str {
        &self.issued_at
    }

    /// The request signature returned by the token endpoint, when present.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// A session is dispatchable only when both the token and instance URL are set.
    pub fn is_valid(&self) -> bool {
        !self.access_token.is_empty() && !self.instance_url.is_empty()
    }
}

//! Error types for forcekit-client, including the Salesforce wire error shape.

use serde::{Deserialize, Serialize};

/// Error code Salesforce returns when the session token has expired or been
/// revoked. Detected in the response body, not from the HTTP status.
pub const INVALID_SESSION_ID: &str = "INVALID_SESSION_ID";

/// Result type alias for forcekit-client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for forcekit-client operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Returns true if this is a structured API error from Salesforce.
    pub fn is_api_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Api(_))
    }

    /// The decoded API error entries, when this is a structured API error.
    pub fn api_errors(&self) -> Option<&ApiErrors> {
        match &self.kind {
            ErrorKind::Api(errors) => Some(errors),
            _ => None,
        }
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// The session is missing its access token or instance URL; caught before
    /// any network traffic.
    #[error("Invalid session: access token and instance URL must be set")]
    InvalidSession,

    /// Request timeout.
    #[error("Request timeout")]
    Timeout,

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// HTTP-level failure reported by the transport.
    #[error("HTTP error: {status} {message}")]
    Http { status: u16, message: String },

    /// Structured error payload returned by Salesforce.
    #[error("Salesforce API error: {0}")]
    Api(ApiErrors),

    /// Response body matched neither the expected shape nor the error shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Request payload could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// JSON error outside the dual-path decode (e.g. malformed cached data).
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Authentication failed while establishing or refreshing the session.
    #[error(transparent)]
    Auth(forcekit_auth::Error),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::Connection(err.to_string())
        } else if let Some(status) = err.status() {
            ErrorKind::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ErrorKind::Other(err.to_string())
        };

        Error::with_source(kind, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::Config(format!("Invalid URL: {}", err)), err)
    }
}

impl From<serde_urlencoded::ser::Error> for Error {
    fn from(err: serde_urlencoded::ser::Error) -> Self {
        Error::with_source(ErrorKind::Serialization(err.to_string()), err)
    }
}

impl From<forcekit_auth::Error> for Error {
    fn from(err: forcekit_auth::Error) -> Self {
        Error::new(ErrorKind::Auth(err))
    }
}

/// One entry of the Salesforce error payload.
///
/// The same shape serves REST errors (`errorCode`/`message`/`fields`), OAuth
/// failures (`error`/`error_description`) and async-API exceptions
/// (`exceptionCode`/`exceptionMessage`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(default, rename = "errorCode", skip_serializing_if = "String::is_empty")]
    pub error_code: String,
    #[serde(default, rename = "error", skip_serializing_if = "String::is_empty")]
    pub error_name: String,
    #[serde(
        default,
        rename = "error_description",
        skip_serializing_if = "String::is_empty"
    )]
    pub error_description: String,
    #[serde(
        default,
        rename = "exceptionCode",
        skip_serializing_if = "String::is_empty"
    )]
    pub exception_code: String,
    #[serde(
        default,
        rename = "exceptionMessage",
        skip_serializing_if = "String::is_empty"
    )]
    pub exception_message: String,
}

impl ApiError {
    /// A real error entry carries at least one populated field. Decoding a
    /// legitimate response into this shape yields all-empty entries, which
    /// must not be mistaken for errors.
    pub fn is_valid(&self) -> bool {
        !self.fields.is_empty()
            || !self.message.is_empty()
            || !self.error_code.is_empty()
            || !self.error_name.is_empty()
            || !self.error_description.is_empty()
            || !self.exception_code.is_empty()
            || !self.exception_message.is_empty()
    }

    /// The code identifying this error, whichever field the API used for it.
    pub fn code(&self) -> &str {
        if !self.error_code.is_empty() {
            &self.error_code
        } else if !self.error_name.is_empty() {
            &self.error_name
        } else {
            &self.exception_code
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = self.code();
        let message = if !self.message.is_empty() {
            &self.message
        } else if !self.error_description.is_empty() {
            &self.error_description
        } else {
            &self.exception_message
        };
        if code.is_empty() {
            write!(f, "{}", message)
        } else if message.is_empty() {
            write!(f, "{}", code)
        } else {
            write!(f, "{}: {}", code, message)
        }?;
        if !self.fields.is_empty() {
            write!(f, " (fields: {})", self.fields.join(", "))?;
        }
        Ok(())
    }
}

/// The decoded API error collection Salesforce sends as a response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiErrors(pub Vec<ApiError>);

impl ApiErrors {
    /// Field-level validity: at least one entry must carry real content.
    pub fn is_valid(&self) -> bool {
        self.0.iter().any(ApiError::is_valid)
    }

    /// Returns true if any entry carries the given error code.
    pub fn contains_code(&self, code: &str) -> bool {
        self.0.iter().any(|e| e.code() == code)
    }

    /// Returns true if this collection signals an expired or revoked session.
    pub fn is_session_expired(&self) -> bool {
        self.contains_code(INVALID_SESSION_ID)
    }

    /// The decoded entries.
    pub fn entries(&self) -> &[ApiError] {
        &self.0
    }
}

impl std::fmt::Display for ApiErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for entry in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}", entry)?;
            first = false;
        }
        Ok(())
    }
}

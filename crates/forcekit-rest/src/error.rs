//! Error types for forcekit-rest.

use forcekit_client::ApiErrors;

pub type Result<T> = std::result::Result<T, Error>;

/// Error type for REST API operations.
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

    /// The structured API errors carried by this error, when the underlying
    /// transport surfaced any.
    pub fn api_errors(&self) -> Option<&ApiErrors> {
        match &self.kind {
            ErrorKind::Client(err) => err.api_errors(),
            _ => None,
        }
    }
}

/// Error classification for REST API operations.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Transport or API error from the underlying client.
    #[error(transparent)]
    Client(forcekit_client::Error),

    /// No cached metadata for the named object type.
    #[error("no metadata found for object `{0}`")]
    MissingMetadata(String),

    /// The discovery map has no entry for the named resource.
    #[error("resource `{0}` is not in the discovery map")]
    MissingResource(String),

    /// The record type declares no external id field.
    #[error("`{0}` does not declare an external id field")]
    MissingExternalId(String),

    /// A timestamp could not be interpreted.
    #[error("invalid timestamp: {0}")]
    Datetime(String),

    /// The server reported success but the body was not usable.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl From<forcekit_client::Error> for Error {
    fn from(err: forcekit_client::Error) -> Self {
        Error {
            kind: ErrorKind::Client(err),
            source: None,
        }
    }
}

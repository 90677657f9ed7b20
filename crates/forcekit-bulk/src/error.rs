//! Error types for forcekit-bulk.

use crate::types::JobState;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    pub kind: ErrorKind,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Transport or API failure reported by the underlying client.
    #[error("Client error: {0}")]
    Client(String),
    /// The job payload was missing or malformed.
    #[error("Job error: {0}")]
    Job(String),
    /// The job is not in the state this call needs, caught locally before
    /// any request is sent.
    #[error("Job is {actual}, must be {required}")]
    State {
        required: JobState,
        actual: JobState,
    },
}

impl From<forcekit_client::Error> for Error {
    fn from(err: forcekit_client::Error) -> Self {
        Error {
            kind: ErrorKind::Client(err.to_string()),
            source: Some(Box::new(err)),
        }
    }
}

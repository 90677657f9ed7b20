//! # forcekit-bulk
//!
//! Salesforce Bulk API client for moving large record sets through
//! asynchronous jobs.
//!
//! ## Features
//!
//! - **Job lifecycle**: create, attach, close, abort, refresh
//! - **Batches**: submit typed records or pre-encoded payloads, list and
//!   inspect batches, collect per-record results
//! - **JSON first**: jobs default to JSON batches; CSV, XML and zipped
//!   formats are available per job
//! - **Forward compatible**: unrecognized job and batch states decode as
//!   `Unknown` instead of failing the payload
//!
//! ## Example
//!
//! ```rust,ignore
//! use forcekit_bulk::{BulkClient, BulkOperation, CreateJobRequest};
//! use serde_json::json;
//!
//! let bulk = BulkClient::new(client);
//!
//! let mut job = bulk
//!     .create_job(CreateJobRequest::new("Account", BulkOperation::Insert))
//!     .await?;
//!
//! let batch = job.add_batch(&[
//!     json!({"Name": "Acme Corp"}),
//!     json!({"Name": "Global Inc"}),
//! ]).await?;
//!
//! // No more batches; let the queued ones execute.
//! job.close().await?;
//!
//! // Later, from any handle:
//! let mut job = bulk.job(job.id()).await?;
//! if job.state().is_terminal() {
//!     let ids = job.batch_record_ids(&batch.id, false).await?;
//!     println!("created {} records", ids.len());
//! }
//! ```
//!
//! The job handle never polls on its own: callers decide when to call
//! [`Job::refresh`] or [`Job::batch_state`] and at what cadence.

mod client;
mod error;
mod types;

pub use client::{BulkClient, Job};
pub use error::{Error, ErrorKind, Result};
pub use types::{
    BatchInfo, BatchList, BatchResultError, BatchResultRow, BatchState, BulkOperation,
    ConcurrencyMode, ContentType, CreateJobRequest, JobInfo, JobState, MAX_BATCH_BYTES,
    MAX_BATCH_CHARS, MAX_BATCH_RECORDS, MAX_FIELD_CHARS, MAX_RECORD_CHARS, MAX_RECORD_FIELDS,
};

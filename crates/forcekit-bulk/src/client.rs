//! Bulk API job and batch management.
//!
//! Jobs and their batches live under the async endpoint root, which is
//! addressed with a bare version number rather than the `v`-prefixed form
//! the REST resources use.

use serde::{de::DeserializeOwned, Serialize};
use tracing::instrument;

use forcekit_client::{ApiRequest, Body, ForceClient, Method};

use crate::error::{Error, ErrorKind, Result};
use crate::types::*;

/// Entry point for bulk work: creates new jobs and attaches to existing ones.
///
/// # Example
///
/// ```rust,ignore
/// use forcekit_bulk::{BulkClient, BulkOperation, CreateJobRequest};
///
/// let bulk = BulkClient::new(client);
///
/// let mut job = bulk
///     .create_job(CreateJobRequest::new("Account", BulkOperation::Insert))
///     .await?;
///
/// let batch = job.add_batch(&records).await?;
/// job.close().await?;
///
/// let results = job.batch_results(&batch.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct BulkClient {
    client: ForceClient,
}

impl BulkClient {
    pub fn new(client: ForceClient) -> Self {
        Self { client }
    }

    /// The underlying transport client.
    pub fn client(&self) -> &ForceClient {
        &self.client
    }

    /// The API version jobs are created under.
    pub fn api_version(&self) -> &str {
        self.client.api_version()
    }

    fn job_root(&self) -> String {
        format!(
            "/services/async/{}/job",
            self.client.api_version().trim_start_matches('v')
        )
    }

    /// Create a job and return a handle to it.
    #[instrument(skip(self, request), fields(object = %request.object))]
    pub async fn create_job(&self, request: CreateJobRequest) -> Result<Job> {
        let info: JobInfo = require(
            self.client.post(&self.job_root(), &[], &request).await?,
            "job create",
        )?;

        let path = format!("{}/{}", self.job_root(), info.id);
        Ok(Job {
            client: self.client.clone(),
            path,
            info,
        })
    }

    /// Attach to an existing job by id, fetching its current state.
    #[instrument(skip(self))]
    pub async fn job(&self, id: &str) -> Result<Job> {
        let path = format!("{}/{}", self.job_root(), id);
        let info: JobInfo = require(self.client.get(&path, &[]).await?, "job fetch")?;

        Ok(Job {
            client: self.client.clone(),
            path,
            info,
        })
    }
}

/// Handle to one bulk job.
///
/// The handle keeps the job info from the most recent server response.
/// State-changing calls take `&mut self` and fold the response back into
/// that snapshot; [`Job::refresh`] re-fetches it on demand.
#[derive(Debug, Clone)]
pub struct Job {
    client: ForceClient,
    path: String,
    info: JobInfo,
}

impl Job {
    pub fn id(&self) -> &str {
        &self.info.id
    }

    /// Last known state. Only as fresh as the last server response folded
    /// into this handle.
    pub fn state(&self) -> JobState {
        self.info.state
    }

    /// Last known job info.
    pub fn info(&self) -> &JobInfo {
        &self.info
    }

    /// Re-fetch the job from the server and replace the local snapshot.
    #[instrument(skip(self), fields(job_id = %self.info.id))]
    pub async fn refresh(&mut self) -> Result<&JobInfo> {
        self.info = require(self.client.get(&self.path, &[]).await?, "job fetch")?;
        Ok(&self.info)
    }

    /// Add a batch of records, serialized as one JSON array.
    ///
    /// Fails locally when the last known state is not [`JobState::Open`],
    /// without sending anything. Batch size limits are the caller's
    /// responsibility; see [`MAX_BATCH_RECORDS`] and friends.
    #[instrument(skip(self, records), fields(job_id = %self.info.id, records = records.len()))]
    pub async fn add_batch<T: Serialize>(&self, records: &[T]) -> Result<BatchInfo> {
        self.require_open()?;

        let path = format!("{}/batch", self.path);
        require(self.client.post(&path, &[], records).await?, "batch create")
    }

    /// Add a batch from a pre-encoded payload, e.g. a CSV document for a
    /// CSV job. The payload passes through verbatim under the given
    /// content type.
    #[instrument(skip(self, payload), fields(job_id = %self.info.id))]
    pub async fn add_batch_raw(
        &self,
        content_type: ContentType,
        payload: impl Into<String>,
    ) -> Result<BatchInfo> {
        self.require_open()?;

        let request = ApiRequest::new(Method::Post, format!("{}/batch", self.path))
            .with_body(Body::Raw(payload.into()))
            .with_content_type(content_type.http_content_type());

        require(self.client.send(request).await?, "batch create")
    }

    fn require_open(&self) -> Result<()> {
        if self.info.state != JobState::Open {
            return Err(Error::new(ErrorKind::State {
                required: JobState::Open,
                actual: self.info.state,
            }));
        }
        Ok(())
    }

    /// Close the job so queued batches start executing.
    ///
    /// Closing a job that has already left [`JobState::Open`] is a no-op
    /// that reports success without a server call.
    #[instrument(skip(self), fields(job_id = %self.info.id))]
    pub async fn close(&mut self) -> Result<()> {
        if self.info.state != JobState::Open {
            return Ok(());
        }

        let body = StateChange {
            state: JobState::Closed,
        };
        self.info = require(self.client.post(&self.path, &[], &body).await?, "job close")?;
        Ok(())
    }

    /// Abort the job. Always dispatched: aborting twice surfaces whatever
    /// the server answers the second time. Batches already processed are
    /// not rolled back.
    #[instrument(skip(self), fields(job_id = %self.info.id))]
    pub async fn abort(&mut self) -> Result<()> {
        let body = StateChange {
            state: JobState::Aborted,
        };
        self.info = require(
            self.client.patch(&self.path, &[], &body).await?,
            "job abort",
        )?;
        Ok(())
    }

    /// List every batch of this job.
    #[instrument(skip(self), fields(job_id = %self.info.id))]
    pub async fn batches(&self) -> Result<Vec<BatchInfo>> {
        let path = format!("{}/batch", self.path);
        let list: BatchList = require(self.client.get(&path, &[]).await?, "batch listing")?;
        Ok(list.batch_info)
    }

    /// Fetch one batch's current info.
    #[instrument(skip(self), fields(job_id = %self.info.id))]
    pub async fn batch(&self, batch_id: &str) -> Result<BatchInfo> {
        let path = format!("{}/batch/{}", self.path, batch_id);
        require(self.client.get(&path, &[]).await?, "batch fetch")
    }

    /// Fetch one batch's current state.
    pub async fn batch_state(&self, batch_id: &str) -> Result<BatchState> {
        Ok(self.batch(batch_id).await?.state)
    }

    /// Fetch the records a batch was submitted with.
    #[instrument(skip(self), fields(job_id = %self.info.id))]
    pub async fn batch_request<T: DeserializeOwned>(&self, batch_id: &str) -> Result<Vec<T>> {
        let path = format!("{}/batch/{}/request", self.path, batch_id);
        require(self.client.get(&path, &[]).await?, "batch request")
    }

    /// Fetch the per-record results of a processed batch, in submission
    /// order.
    #[instrument(skip(self), fields(job_id = %self.info.id))]
    pub async fn batch_results(&self, batch_id: &str) -> Result<Vec<BatchResultRow>> {
        let path = format!("{}/batch/{}/result", self.path, batch_id);
        require(self.client.get(&path, &[]).await?, "batch result")
    }

    /// Record ids from a batch's results. With `all` false only rows that
    /// succeeded or were created contribute; rows without an id never do.
    pub async fn batch_record_ids(&self, batch_id: &str, all: bool) -> Result<Vec<String>> {
        let rows = self.batch_results(batch_id).await?;

        Ok(rows
            .into_iter()
            .filter(|row| all || row.success || row.created)
            .map(|row| row.id)
            .filter(|id| !id.is_empty())
            .collect())
    }
}

#[derive(Serialize)]
struct StateChange {
    state: JobState,
}

fn require<T>(body: Option<T>, what: &str) -> Result<T> {
    body.ok_or_else(|| Error::new(ErrorKind::Job(format!("{} returned no content", what))))
}

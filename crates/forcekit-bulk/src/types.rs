//! Types for Bulk API jobs and batches.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Maximum number of records one batch can hold.
pub const MAX_BATCH_RECORDS: usize = 10_000;

/// Maximum batch payload size in bytes.
pub const MAX_BATCH_BYTES: usize = 10 * 1024 * 1024;

/// Maximum characters across all data in a batch.
pub const MAX_BATCH_CHARS: usize = 10_000_000;

/// Maximum characters across all fields of a single record.
pub const MAX_RECORD_CHARS: usize = 400_000;

/// Maximum characters in a single field.
pub const MAX_FIELD_CHARS: usize = 32_000;

/// Maximum number of fields in a single record.
pub const MAX_RECORD_FIELDS: usize = 5_000;

/// Deserialize an API version that arrives either as a number (62.0) or a
/// string ("62.0").
pub(crate) fn deserialize_api_version<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ApiVersion {
        Float(f64),
        String(String),
    }

    Option::<ApiVersion>::deserialize(deserializer).map(|opt| {
        opt.map(|v| match v {
            ApiVersion::Float(f) => format!("{:.1}", f),
            ApiVersion::String(s) => s,
        })
    })
}

/// Lifecycle states of a bulk job.
///
/// States the platform may add later deserialize as [`JobState::Unknown`]
/// instead of failing the whole payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    /// Accepting batches.
    Open,
    /// No more batches can be added; queued batches execute.
    #[serde(alias = "UploadComplete")]
    Closed,
    /// Abandoned by the caller. Batches already processed are not rolled back.
    Aborted,
    /// Every batch finished processing.
    #[serde(alias = "Completed")]
    JobComplete,
    /// The job itself failed.
    Failed,
    /// A state this client does not recognize.
    #[serde(other)]
    Unknown,
}

impl JobState {
    /// Whether the job can no longer make progress.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Aborted | JobState::JobComplete | JobState::Failed
        )
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobState::Open => "Open",
            JobState::Closed => "Closed",
            JobState::Aborted => "Aborted",
            JobState::JobComplete => "JobComplete",
            JobState::Failed => "Failed",
            JobState::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// Processing states of a single batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchState {
    /// Waiting for the job to close or for capacity.
    Queued,
    /// Being processed. An aborted job still runs its in-progress batches.
    InProgress,
    /// Processed to the end; per-record results are available. Individual
    /// records may still have failed.
    Completed,
    /// The batch as a whole failed, e.g. a malformed payload.
    Failed,
    /// Skipped because the job was aborted while the batch was queued.
    NotProcessed,
    /// A state this client does not recognize.
    #[serde(other)]
    Unknown,
}

impl BatchState {
    /// Whether processing of this batch has ended.
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            BatchState::Completed | BatchState::Failed | BatchState::NotProcessed
        )
    }
}

impl fmt::Display for BatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BatchState::Queued => "Queued",
            BatchState::InProgress => "InProgress",
            BatchState::Completed => "Completed",
            BatchState::Failed => "Failed",
            BatchState::NotProcessed => "NotProcessed",
            BatchState::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// Per-record operations a job can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BulkOperation {
    Insert,
    Update,
    Upsert,
    /// Deleted records land in the recycle bin.
    Delete,
    /// Deleted records skip the recycle bin. Requires an org permission
    /// that is off by default.
    HardDelete,
    Query,
    QueryAll,
}

impl BulkOperation {
    /// The wire spelling of this operation.
    pub fn api_name(&self) -> &'static str {
        match self {
            BulkOperation::Insert => "insert",
            BulkOperation::Update => "update",
            BulkOperation::Upsert => "upsert",
            BulkOperation::Delete => "delete",
            BulkOperation::HardDelete => "hardDelete",
            BulkOperation::Query => "query",
            BulkOperation::QueryAll => "queryAll",
        }
    }
}

/// Payload format of a job's batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ContentType {
    #[default]
    #[serde(rename = "JSON")]
    Json,
    #[serde(rename = "CSV")]
    Csv,
    #[serde(rename = "XML")]
    Xml,
    #[serde(rename = "ZIP_CSV")]
    ZipCsv,
    #[serde(rename = "ZIP_JSON")]
    ZipJson,
    #[serde(rename = "ZIP_XML")]
    ZipXml,
}

impl ContentType {
    /// The HTTP content type batch uploads of this format are sent with.
    pub fn http_content_type(&self) -> &'static str {
        match self {
            ContentType::Json => "application/json; charset=UTF-8",
            ContentType::Csv => "text/csv; charset=UTF-8",
            ContentType::Xml => "application/xml; charset=UTF-8",
            ContentType::ZipCsv => "zip/csv",
            ContentType::ZipJson => "zip/json",
            ContentType::ZipXml => "zip/xml",
        }
    }
}

/// Concurrency mode a job's batches run under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ConcurrencyMode {
    /// Batches may run at the same time. Lock contention on the same rows
    /// can fail the job.
    #[default]
    Parallel,
    /// Batches run one at a time.
    Serial,
}

/// Request body for creating a job.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    /// Object type the job processes. One type per job.
    pub object: String,
    pub operation: BulkOperation,
    pub content_type: ContentType,
    /// External id field for upsert jobs. Values must be present in the
    /// batch data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id_field_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency_mode: Option<ConcurrencyMode>,
}

impl CreateJobRequest {
    pub fn new(object: impl Into<String>, operation: BulkOperation) -> Self {
        Self {
            object: object.into(),
            operation,
            content_type: ContentType::default(),
            external_id_field_name: None,
            concurrency_mode: None,
        }
    }

    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    /// Required for [`BulkOperation::Upsert`] jobs.
    pub fn with_external_id_field(mut self, field: impl Into<String>) -> Self {
        self.external_id_field_name = Some(field.into());
        self
    }

    pub fn with_concurrency_mode(mut self, mode: ConcurrencyMode) -> Self {
        self.concurrency_mode = Some(mode);
        self
    }
}

/// A job as reported by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInfo {
    pub id: String,
    pub state: JobState,
    #[serde(default)]
    pub object: String,
    pub operation: BulkOperation,

    #[serde(default)]
    pub external_id_field_name: Option<String>,
    #[serde(default)]
    pub concurrency_mode: Option<ConcurrencyMode>,
    #[serde(default)]
    pub content_type: Option<ContentType>,
    /// Arrives as a number from v1 endpoints and as a string elsewhere.
    #[serde(default, deserialize_with = "deserialize_api_version")]
    pub api_version: Option<String>,

    #[serde(default)]
    pub created_by_id: Option<String>,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub system_modstamp: Option<String>,

    #[serde(default)]
    pub number_batches_queued: i64,
    #[serde(default)]
    pub number_batches_in_progress: i64,
    #[serde(default)]
    pub number_batches_completed: i64,
    #[serde(default)]
    pub number_batches_failed: i64,
    #[serde(default)]
    pub number_batches_total: i64,

    #[serde(default)]
    pub number_records_processed: i64,
    #[serde(default)]
    pub number_records_failed: i64,
    #[serde(default)]
    pub number_retries: i64,

    #[serde(default)]
    pub api_active_processing_time: i64,
    #[serde(default)]
    pub apex_processing_time: i64,
    #[serde(default)]
    pub total_processing_time: i64,
}

/// A batch as reported by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchInfo {
    pub id: String,
    #[serde(default)]
    pub job_id: String,
    pub state: BatchState,

    /// Details about the state, e.g. the failure reason of a failed batch.
    #[serde(default)]
    pub state_message: Option<String>,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub system_modstamp: Option<String>,

    #[serde(default)]
    pub number_records_processed: i64,
    #[serde(default)]
    pub number_records_failed: i64,

    #[serde(default)]
    pub api_active_processing_time: i64,
    #[serde(default)]
    pub apex_processing_time: i64,
    #[serde(default)]
    pub total_processing_time: i64,
}

/// Envelope of the batch listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchList {
    #[serde(rename = "batchInfo", default)]
    pub batch_info: Vec<BatchInfo>,
}

/// Outcome of one record within a processed batch.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchResultRow {
    #[serde(default)]
    pub id: String,
    pub success: bool,
    #[serde(default)]
    pub created: bool,
    #[serde(default)]
    pub errors: Vec<BatchResultError>,
}

/// Error attached to a failed record in a batch result.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchResultError {
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "statusCode", default)]
    pub status_code: String,
}

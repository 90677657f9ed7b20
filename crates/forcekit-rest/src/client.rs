//! Typed REST API facade.
//!
//! [`RestClient`] wraps a [`ForceClient`] and resolves every operation
//! through the org's self-describing discovery documents: the versioned
//! data root names the top-level resources, and the global object listing
//! names each object's endpoints. Paths are never assembled from guessed
//! literals.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use forcekit_client::ForceClient;

use crate::composite::{CompositeRequest, CompositeResponse};
use crate::datetime::SfDateTime;
use crate::describe::{DescribeGlobalResult, SObjectDescribe, SObjectMeta};
use crate::error::{Error, ErrorKind, Result};
use crate::query::{build_query, QueryResult};
use crate::records::{SObject, SaveResult, UpsertResult};

/// Discovery map key of the limits resource.
pub const RESOURCE_LIMITS: &str = "limits";
/// Discovery map key of the query resource.
pub const RESOURCE_QUERY: &str = "query";
/// Discovery map key of the query-all resource (includes soft-deleted rows).
pub const RESOURCE_QUERY_ALL: &str = "queryAll";
/// Discovery map key of the object listing resource.
pub const RESOURCE_SOBJECTS: &str = "sobjects";
/// Discovery map key of the SOSL search resource.
pub const RESOURCE_SEARCH: &str = "search";
/// Discovery map key of the composite resource.
pub const RESOURCE_COMPOSITE: &str = "composite";

const URL_SOBJECT: &str = "sobject";
const URL_DESCRIBE: &str = "describe";
const URL_ROW_TEMPLATE: &str = "rowTemplate";
const ID_PLACEHOLDER: &str = "{ID}";

const DATA_ROOT: &str = "/services/data";

/// Behavior switches for [`RestClient`].
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Keep per-object describe results in memory after the first fetch.
    /// On by default; disable for long-lived processes that must observe
    /// live schema changes on every call.
    pub cache_describes: bool,
}

impl Default for RestConfig {
    fn default() -> Self {
        RestConfig {
            cache_describes: true,
        }
    }
}

impl RestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache_describes(mut self, cache_describes: bool) -> Self {
        self.cache_describes = cache_describes;
        self
    }
}

/// Object listing state captured at connect time.
#[derive(Debug, Default)]
struct ObjectCatalog {
    objects: HashMap<String, SObjectMeta>,
    max_batch_size: i64,
    encoding: String,
}

#[derive(Debug)]
struct RestInner {
    client: ForceClient,
    config: RestConfig,
    resources: RwLock<HashMap<String, String>>,
    catalog: RwLock<ObjectCatalog>,
    describes: RwLock<HashMap<String, Arc<SObjectDescribe>>>,
}

/// REST API client bound to one org.
///
/// Cloning is cheap and clones share the discovery map, the object catalog
/// and the describe cache.
///
/// # Example
///
/// ```rust,ignore
/// use forcekit_client::{Credentials, ForceClient};
/// use forcekit_rest::{Account, RestClient};
///
/// let credentials = Credentials::password(key, secret, username, password, token);
/// let client = ForceClient::login(credentials).await?;
/// let rest = RestClient::connect(client).await?;
///
/// let account: Account = rest.get_record("001D000000IqhSL", &[]).await?;
///
/// let soql = rest
///     .build_query_all_fields::<Account>(&["BillingCountry = 'Norway'"])
///     .await?;
/// let page = rest.query::<Account>(&soql).await?;
/// ```
#[derive(Debug, Clone)]
pub struct RestClient {
    inner: Arc<RestInner>,
}

impl RestClient {
    /// Connect with default configuration. See [`RestClient::connect_with_config`].
    pub async fn connect(client: ForceClient) -> Result<Self> {
        Self::connect_with_config(client, RestConfig::default()).await
    }

    /// Fetch the org's resource map and object listing, then return a ready
    /// client. A failure of either discovery call fails construction, since
    /// every later operation resolves its path through them.
    pub async fn connect_with_config(client: ForceClient, config: RestConfig) -> Result<Self> {
        let rest = RestClient {
            inner: Arc::new(RestInner {
                client,
                config,
                resources: RwLock::new(HashMap::new()),
                catalog: RwLock::new(ObjectCatalog::default()),
                describes: RwLock::new(HashMap::new()),
            }),
        };

        rest.load_resources().await?;
        rest.load_objects().await?;

        Ok(rest)
    }

    /// The underlying transport client.
    pub fn client(&self) -> &ForceClient {
        &self.inner.client
    }

    /// The REST API version this client addresses.
    pub fn api_version(&self) -> &str {
        self.inner.client.api_version()
    }

    async fn load_resources(&self) -> Result<()> {
        let path = format!("{}/v{}", DATA_ROOT, self.inner.client.api_version());
        let map: HashMap<String, String> =
            require_body(self.inner.client.get(&path, &[]).await?, "resource discovery")?;

        debug!(resources = map.len(), "discovered API resources");
        *self.inner.resources.write().await = map;

        Ok(())
    }

    async fn load_objects(&self) -> Result<Vec<SObjectMeta>> {
        let path = self.resource(RESOURCE_SOBJECTS).await?;
        let listing: DescribeGlobalResult =
            require_body(self.inner.client.get(&path, &[]).await?, "object listing")?;

        debug!(
            objects = listing.sobjects.len(),
            max_batch_size = listing.max_batch_size,
            "loaded object catalog"
        );

        let mut catalog = self.inner.catalog.write().await;
        catalog.max_batch_size = listing.max_batch_size;
        catalog.encoding = listing.encoding;
        catalog.objects = listing
            .sobjects
            .iter()
            .map(|meta| (meta.name.clone(), meta.clone()))
            .collect();

        Ok(listing.sobjects)
    }

    /// Look up a top-level resource path by its discovery map key.
    pub async fn resource(&self, key: &str) -> Result<String> {
        let resources = self.inner.resources.read().await;
        resources
            .get(key)
            .cloned()
            .ok_or_else(|| Error::new(ErrorKind::MissingResource(key.to_string())))
    }

    async fn object_url(&self, object: &str, key: &str) -> Result<String> {
        let meta = self.object_meta(object).await?;
        meta.urls
            .get(key)
            .cloned()
            .ok_or_else(|| Error::new(ErrorKind::MissingResource(format!("{}.{}", object, key))))
    }

    async fn row_path(&self, object: &str, id: &str) -> Result<String> {
        let template = self.object_url(object, URL_ROW_TEMPLATE).await?;
        Ok(template.replacen(ID_PLACEHOLDER, id, 1))
    }

    // =========================================================================
    // Catalog and describe
    // =========================================================================

    /// Re-fetch the global object listing, replacing the cached catalog, and
    /// return the fresh entries.
    #[instrument(skip(self))]
    pub async fn describe_global(&self) -> Result<Vec<SObjectMeta>> {
        self.load_objects().await
    }

    /// Catalog entry for one object type.
    pub async fn object_meta(&self, object: &str) -> Result<SObjectMeta> {
        let catalog = self.inner.catalog.read().await;
        catalog
            .objects
            .get(object)
            .cloned()
            .ok_or_else(|| Error::new(ErrorKind::MissingMetadata(object.to_string())))
    }

    /// Whether every named object type exists in the catalog.
    pub async fn has_access(&self, objects: &[&str]) -> bool {
        let catalog = self.inner.catalog.read().await;
        objects
            .iter()
            .all(|name| catalog.objects.contains_key(*name))
    }

    /// The org's maximum batch size, reported by the object listing.
    pub async fn max_batch_size(&self) -> i64 {
        self.inner.catalog.read().await.max_batch_size
    }

    /// The org's character encoding, reported by the object listing.
    pub async fn encoding(&self) -> String {
        self.inner.catalog.read().await.encoding.clone()
    }

    /// Full metadata for one object type.
    ///
    /// Results are cached unless [`RestConfig::cache_describes`] is off.
    /// Concurrent first calls may each fetch; the cache keeps one of them.
    #[instrument(skip(self))]
    pub async fn describe_object(&self, object: &str) -> Result<Arc<SObjectDescribe>> {
        if self.inner.config.cache_describes {
            let describes = self.inner.describes.read().await;
            if let Some(describe) = describes.get(object) {
                return Ok(Arc::clone(describe));
            }
        }

        let path = self.object_url(object, URL_DESCRIBE).await?;
        let mut describe: SObjectDescribe =
            require_body(self.inner.client.get(&path, &[]).await?, "describe")?;
        describe.precompute_all_fields();

        let describe = Arc::new(describe);
        if self.inner.config.cache_describes {
            let mut describes = self.inner.describes.write().await;
            describes.insert(object.to_string(), Arc::clone(&describe));
        }

        Ok(describe)
    }

    /// Drop one object's cached describe so the next call re-fetches it.
    pub async fn invalidate_describe(&self, object: &str) {
        self.inner.describes.write().await.remove(object);
    }

    /// Drop every cached describe.
    pub async fn clear_describe_cache(&self) {
        self.inner.describes.write().await.clear();
    }

    // =========================================================================
    // Record CRUD
    // =========================================================================

    /// Fetch a record by id. Pass field names to project a subset; an empty
    /// slice lets the server pick its defaults.
    #[instrument(skip(self))]
    pub async fn get_record<T>(&self, id: &str, fields: &[&str]) -> Result<T>
    where
        T: SObject + DeserializeOwned,
    {
        let path = self.row_path(T::api_name(), id).await?;

        let joined;
        let mut params: Vec<(&str, &str)> = Vec::new();
        if !fields.is_empty() {
            joined = fields.join(",");
            params.push(("fields", joined.as_str()));
        }

        require_body(self.inner.client.get(&path, &params).await?, "record fetch")
    }

    /// Create a record and return the save outcome with its new id.
    #[instrument(skip(self, record))]
    pub async fn insert_record<T>(&self, record: &T) -> Result<SaveResult>
    where
        T: SObject + Serialize,
    {
        let path = self.object_url(T::api_name(), URL_SOBJECT).await?;
        require_body(self.inner.client.post(&path, &[], record).await?, "insert")
    }

    /// Overwrite the populated fields of an existing record.
    #[instrument(skip(self, record))]
    pub async fn update_record<T>(&self, id: &str, record: &T) -> Result<()>
    where
        T: SObject + Serialize,
    {
        let path = self.row_path(T::api_name(), id).await?;
        self.inner
            .client
            .patch::<serde_json::Value, T>(&path, &[], record)
            .await?;
        Ok(())
    }

    /// Delete a record by id.
    #[instrument(skip(self))]
    pub async fn delete_record<T: SObject>(&self, id: &str) -> Result<()> {
        let path = self.row_path(T::api_name(), id).await?;
        self.inner.client.delete(&path, &[]).await?;
        Ok(())
    }

    /// Fetch a record addressed by its external id value.
    #[instrument(skip(self))]
    pub async fn get_record_by_external_id<T>(&self, value: &str, fields: &[&str]) -> Result<T>
    where
        T: SObject + DeserializeOwned,
    {
        let path = self.external_path::<T>(value).await?;

        let joined;
        let mut params: Vec<(&str, &str)> = Vec::new();
        if !fields.is_empty() {
            joined = fields.join(",");
            params.push(("fields", joined.as_str()));
        }

        require_body(self.inner.client.get(&path, &params).await?, "record fetch")
    }

    /// Create or update a record addressed by its external id value.
    ///
    /// The returned [`UpsertResult::created`] flag tells the outcomes apart.
    /// An update sends no response body, so the synthesized result carries
    /// no record id.
    #[instrument(skip(self, record))]
    pub async fn upsert_record_by_external_id<T>(
        &self,
        value: &str,
        record: &T,
    ) -> Result<UpsertResult>
    where
        T: SObject + Serialize,
    {
        let path = self.external_path::<T>(value).await?;

        match self.inner.client.patch(&path, &[], record).await? {
            Some(result) => Ok(result),
            None => Ok(UpsertResult {
                id: String::new(),
                success: true,
                created: false,
                errors: Vec::new(),
            }),
        }
    }

    /// Delete a record addressed by its external id value.
    #[instrument(skip(self))]
    pub async fn delete_record_by_external_id<T: SObject>(&self, value: &str) -> Result<()> {
        let path = self.external_path::<T>(value).await?;
        self.inner.client.delete(&path, &[]).await?;
        Ok(())
    }

    async fn external_path<T: SObject>(&self, value: &str) -> Result<String> {
        let field = T::external_id_field()
            .ok_or_else(|| Error::new(ErrorKind::MissingExternalId(T::api_name().to_string())))?;
        let collection = self.object_url(T::api_name(), URL_SOBJECT).await?;

        Ok(format!(
            "{}/{}/{}",
            collection,
            field,
            urlencoding::encode(value)
        ))
    }

    /// Ids of records of type `T` created or updated inside the window,
    /// plus the latest timestamp the result covers. The window bounds are
    /// sent with whole-second precision.
    #[instrument(skip(self))]
    pub async fn updated_records<T: SObject>(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<UpdatedRecords> {
        let collection = self.object_url(T::api_name(), URL_SOBJECT).await?;
        let path = format!("{}/updated/", collection);

        let start = start.to_rfc3339_opts(SecondsFormat::Secs, true);
        let end = end.to_rfc3339_opts(SecondsFormat::Secs, true);
        let params = [("start", start.as_str()), ("end", end.as_str())];

        require_body(
            self.inner.client.get(&path, &params).await?,
            "updated records",
        )
    }

    // =========================================================================
    // Query and search
    // =========================================================================

    /// Execute a SOQL query and decode the first page of results.
    #[instrument(skip(self))]
    pub async fn query<T: DeserializeOwned>(&self, soql: &str) -> Result<QueryResult<T>> {
        let path = self.resource(RESOURCE_QUERY).await?;
        require_body(
            self.inner.client.get(&path, &[("q", soql)]).await?,
            "query",
        )
    }

    /// Like [`RestClient::query`], but rows soft-deleted by a merge or
    /// delete are included.
    #[instrument(skip(self))]
    pub async fn query_all<T: DeserializeOwned>(&self, soql: &str) -> Result<QueryResult<T>> {
        let path = self.resource(RESOURCE_QUERY_ALL).await?;
        require_body(
            self.inner.client.get(&path, &[("q", soql)]).await?,
            "query",
        )
    }

    /// Fetch the next page of an earlier query, using the locator path the
    /// previous page carried in [`QueryResult::next_records_url`].
    #[instrument(skip(self))]
    pub async fn query_next<T: DeserializeOwned>(
        &self,
        next_records_url: &str,
    ) -> Result<QueryResult<T>> {
        require_body(
            self.inner.client.get(next_records_url, &[]).await?,
            "query",
        )
    }

    /// Build a query selecting every describable field of `T`, since SOQL
    /// has no `SELECT *`. Triggers a describe if none is cached.
    pub async fn build_query_all_fields<T: SObject>(&self, constraints: &[&str]) -> Result<String> {
        let describe = self.describe_object(T::api_name()).await?;
        Ok(build_query(&describe.all_fields, T::api_name(), constraints))
    }

    /// Execute a SOSL search. The caller picks the response shape; for the
    /// standard envelope use [`SearchResult`].
    #[instrument(skip(self))]
    pub async fn search<T: DeserializeOwned>(&self, sosl: &str) -> Result<T> {
        let path = self.resource(RESOURCE_SEARCH).await?;
        require_body(
            self.inner.client.get(&path, &[("q", sosl)]).await?,
            "search",
        )
    }

    // =========================================================================
    // Org resources
    // =========================================================================

    /// Current API limits of the org, keyed by limit name.
    #[instrument(skip(self))]
    pub async fn limits(&self) -> Result<Limits> {
        let path = self.resource(RESOURCE_LIMITS).await?;
        require_body(self.inner.client.get(&path, &[]).await?, "limits")
    }

    /// Execute a batch of subrequests in one composite round trip.
    #[instrument(skip(self, request), fields(subrequests = request.subrequests.len()))]
    pub async fn composite(&self, request: &CompositeRequest) -> Result<CompositeResponse> {
        let path = self.resource(RESOURCE_COMPOSITE).await?;
        require_body(
            self.inner.client.post(&path, &[], request).await?,
            "composite",
        )
    }

    /// List the REST API versions the org supports. This endpoint sits at
    /// the unversioned data root and needs no session.
    #[instrument(skip(self))]
    pub async fn versions(&self) -> Result<Vec<ApiVersion>> {
        require_body(
            self.inner.client.get(DATA_ROOT, &[]).await?,
            "version listing",
        )
    }
}

fn require_body<T>(body: Option<T>, what: &str) -> Result<T> {
    body.ok_or_else(|| {
        Error::new(ErrorKind::UnexpectedResponse(format!(
            "{} returned no content",
            what
        )))
    })
}

// ===== Response types =====

/// One row of the version listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiVersion {
    pub label: String,
    pub url: String,
    pub version: String,
}

/// A single org limit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Limit {
    #[serde(rename = "Max")]
    pub max: f64,
    #[serde(rename = "Remaining")]
    pub remaining: f64,
}

/// Org limits keyed by limit name.
pub type Limits = HashMap<String, Limit>;

/// Standard SOSL response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult<T> {
    #[serde(rename = "searchRecords", default)]
    pub search_records: Vec<T>,
}

/// Records changed inside a requested time window.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatedRecords {
    #[serde(default)]
    pub ids: Vec<String>,
    #[serde(rename = "latestDateCovered")]
    pub latest_date_covered: SfDateTime,
}

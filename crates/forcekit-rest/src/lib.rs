//! # forcekit-rest
//!
//! Typed REST API surface on top of `forcekit-client`.
//!
//! ## Features
//!
//! - **Resource discovery** - Endpoint paths resolved from the org's own
//!   discovery documents, never assembled from guessed literals
//! - **Record CRUD** - Typed create, read, update, delete and external-id
//!   upsert through the [`SObject`] trait
//! - **SOQL Query** - First-page execution plus explicit locator-driven
//!   pagination, and a "select every field" query builder
//! - **SOSL Search** - Full-text search decoded into caller types
//! - **Describe** - Global object catalog and cached per-object metadata
//! - **Composite** - Up to 25 subrequests in one round trip with
//!   all-or-none rollback
//! - **Limits and change tracking** - Org limits and updated-record windows
//!
//! ## Example
//!
//! ```rust,ignore
//! use forcekit_client::{Credentials, ForceClient};
//! use forcekit_rest::{Account, QueryResult, RestClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), forcekit_rest::Error> {
//!     let credentials = Credentials::password(
//!         "consumer_key",
//!         "consumer_secret",
//!         "user@example.com",
//!         "password",
//!         "security_token",
//!     );
//!     let client = ForceClient::login(credentials).await?;
//!     let rest = RestClient::connect(client).await?;
//!
//!     let soql = rest
//!         .build_query_all_fields::<Account>(&["BillingCountry = 'Norway'"])
//!         .await?;
//!
//!     let mut page: QueryResult<Account> = rest.query(&soql).await?;
//!     while let Some(locator) = page.next_records_url.take() {
//!         let next: QueryResult<Account> = rest.query_next(&locator).await?;
//!         page.records.extend(next.records);
//!         page.next_records_url = next.next_records_url;
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod composite;
pub mod datetime;
mod describe;
mod error;
mod query;
mod records;

// Main client
pub use client::{
    ApiVersion, Limit, Limits, RestClient, RestConfig, SearchResult, UpdatedRecords,
    RESOURCE_COMPOSITE, RESOURCE_LIMITS, RESOURCE_QUERY, RESOURCE_QUERY_ALL, RESOURCE_SEARCH,
    RESOURCE_SOBJECTS,
};

// Composite API
pub use composite::{
    CompositeRequest, CompositeResponse, CompositeSubrequest, CompositeSubresponse,
};

// Timestamp codec
pub use datetime::SfDateTime;

// Describe types
pub use describe::{
    ChildRelationship, DescribeGlobalResult, FieldDescribe, PicklistValue, RecordTypeInfo,
    SObjectDescribe, SObjectMeta,
};

// Error types
pub use error::{Error, ErrorKind, Result};

// Query types
pub use query::{build_query, QueryResult};

// Record types
pub use records::{
    Account, Lead, RecordAttributes, SObject, SaveError, SaveResult, SystemFields, UpsertResult,
    User,
};

// Re-export transport types that users commonly need
pub use forcekit_client::{ClientConfig, ForceClient, Session};

//! SOQL query types and the query-text builder.

use serde::{Deserialize, Serialize};

/// One page of SOQL query results.
///
/// When the result set exceeds one response, `done` is false and
/// `next_records_url` carries the server-relative path to hand to
/// `query_next`. Continuation is always an explicit call; no method here
/// fetches more than one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult<T> {
    #[serde(rename = "totalSize")]
    pub total_size: i64,
    pub done: bool,
    #[serde(
        rename = "nextRecordsUrl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub next_records_url: Option<String>,
    #[serde(default = "Vec::new")]
    pub records: Vec<T>,
}

impl<T> QueryResult<T> {
    /// True when a further page is available.
    pub fn has_more(&self) -> bool {
        !self.done && self.next_records_url.is_some()
    }
}

/// Assemble SOQL query text from a field list, a table and constraints.
///
/// `fields` is spliced in verbatim; constraints are ANDed together. No quoting
/// or escaping is performed, so values interpolated into constraints must be
/// trusted or pre-escaped by the caller.
pub fn build_query(fields: &str, table: &str, constraints: &[&str]) -> String {
    let mut query = format!("SELECT {fields} FROM {table}");
    if !constraints.is_empty() {
        query.push_str(" WHERE ");
        query.push_str(&constraints.join(" AND "));
    }
    query
}

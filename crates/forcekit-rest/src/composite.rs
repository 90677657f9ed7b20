//! Composite request batching.
//!
//! A composite call packs up to 25 subrequests into one round trip. With
//! `all_or_none` set, any failing subrequest rolls back the record changes
//! of every other subrequest in the batch.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A batch of subrequests executed in order by a single composite call.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompositeRequest {
    #[serde(rename = "allOrNone")]
    pub all_or_none: bool,
    #[serde(rename = "compositeRequest")]
    pub subrequests: Vec<CompositeSubrequest>,
}

impl CompositeRequest {
    pub fn new(all_or_none: bool) -> Self {
        CompositeRequest {
            all_or_none,
            subrequests: Vec::new(),
        }
    }

    /// Append a subrequest to the batch.
    pub fn add(&mut self, subrequest: CompositeSubrequest) -> &mut Self {
        self.subrequests.push(subrequest);
        self
    }
}

/// A single operation within a composite request.
///
/// `url` is the versioned path of the wrapped call, e.g.
/// `/services/data/v62.0/sobjects/Account`. Later subrequests can splice in
/// earlier results with `@{referenceId.field}` expressions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositeSubrequest {
    pub method: String,
    pub url: String,
    #[serde(rename = "referenceId")]
    pub reference_id: String,
    #[serde(
        rename = "httpHeaders",
        default,
        skip_serializing_if = "HashMap::is_empty"
    )]
    pub http_headers: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

impl CompositeSubrequest {
    pub fn new(
        method: impl Into<String>,
        url: impl Into<String>,
        reference_id: impl Into<String>,
    ) -> Self {
        CompositeSubrequest {
            method: method.into(),
            url: url.into(),
            reference_id: reference_id.into(),
            http_headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.http_headers.insert(name.into(), value.into());
        self
    }
}

/// Response envelope of a composite call.
#[derive(Debug, Clone, Deserialize)]
pub struct CompositeResponse {
    #[serde(rename = "compositeResponse")]
    pub responses: Vec<CompositeSubresponse>,
}

impl CompositeResponse {
    /// Find a subresponse by the reference id of its subrequest.
    pub fn by_reference(&self, reference_id: &str) -> Option<&CompositeSubresponse> {
        self.responses
            .iter()
            .find(|response| response.reference_id == reference_id)
    }
}

/// Outcome of one subrequest.
#[derive(Debug, Clone, Deserialize)]
pub struct CompositeSubresponse {
    #[serde(default)]
    pub body: serde_json::Value,
    #[serde(rename = "httpHeaders", default)]
    pub http_headers: HashMap<String, String>,
    #[serde(rename = "httpStatusCode")]
    pub http_status_code: u16,
    #[serde(rename = "referenceId")]
    pub reference_id: String,
}

impl CompositeSubresponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.http_status_code)
    }
}

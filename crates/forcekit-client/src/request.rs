//! Request building blocks for the dispatch pipeline.

/// HTTP method for an API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl Method {
    /// Convert to the reqwest method type.
    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// Request body.
///
/// `Raw` bodies pass through verbatim, treated as pre-encoded by the caller
/// (CSV batches, hand-built JSON).
#[derive(Debug, Clone)]
pub enum Body {
    Json(serde_json::Value),
    Raw(String),
}

/// One API request: a server-relative path plus everything needed to send it.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Server-relative path, e.g. `/services/data/v62.0/query`.
    pub path: String,
    pub params: Vec<(String, String)>,
    pub body: Option<Body>,
    /// Overrides the default `application/json; charset=UTF-8` content type.
    pub content_type: Option<String>,
}

impl ApiRequest {
    /// Create a request for the given method and server-relative path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Vec::new(),
            body: None,
            content_type: None,
        }
    }

    /// Add query parameters.
    pub fn with_params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Add a single query parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Attach a body.
    pub fn with_body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    /// Override the content type for this request.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

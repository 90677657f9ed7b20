//! The core client: session handling plus the request/response pipeline.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use forcekit_auth::{Authenticator, Credentials, Session};

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiErrors, Error, ErrorKind, Result};
use crate::request::{ApiRequest, Body, Method};

/// Content type sent with JSON bodies.
const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Maximum number of re-authentication replays per dispatch. A second expired
/// session on the replayed attempt propagates as a real error.
const SESSION_RETRY_LIMIT: usize = 1;

struct ClientInner {
    http: reqwest::Client,
    config: ClientConfig,
    authenticator: Option<Authenticator>,
    session: RwLock<Session>,
}

/// Authenticated Salesforce client.
///
/// Cheap to clone; clones share the HTTP connection pool and the session, so a
/// re-authentication performed by one clone is visible to all of them.
///
/// Every operation issues one HTTP exchange, or exactly two when the first
/// response reports an expired session and credentials are available for a
/// re-authentication replay.
#[derive(Clone)]
pub struct ForceClient {
    inner: Arc<ClientInner>,
}

impl std::fmt::Debug for ForceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForceClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl ForceClient {
    /// Authenticate with the given credentials and default configuration.
    pub async fn login(credentials: Credentials) -> Result<Self> {
        Self::login_with_config(credentials, ClientConfig::default()).await
    }

    /// Authenticate with the given credentials and configuration.
    ///
    /// The credentials are kept so an expired session can be re-established
    /// during dispatch.
    pub async fn login_with_config(
        credentials: Credentials,
        config: ClientConfig,
    ) -> Result<Self> {
        let http = build_http(&config)?;
        let authenticator = Authenticator::with_http_client(credentials, http.clone());
        let session = authenticator.authenticate().await?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                config,
                authenticator: Some(authenticator),
                session: RwLock::new(session),
            }),
        })
    }

    /// Wrap an existing session (a token obtained elsewhere).
    ///
    /// Without credentials there is nothing to re-authenticate with, so an
    /// expired session surfaces directly as an API error.
    pub fn from_session(session: Session) -> Result<Self> {
        Self::from_session_with_config(session, ClientConfig::default())
    }

    /// Wrap an existing session with a custom configuration.
    pub fn from_session_with_config(session: Session, config: ClientConfig) -> Result<Self> {
        if !session.is_valid() {
            return Err(Error::new(ErrorKind::InvalidSession));
        }
        let http = build_http(&config)?;
        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                config,
                authenticator: None,
                session: RwLock::new(session),
            }),
        })
    }

    /// The client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// The REST API version this client addresses (without the leading `v`).
    pub fn api_version(&self) -> &str {
        &self.inner.config.api_version
    }

    /// A snapshot of the current session.
    pub async fn session(&self) -> Session {
        self.inner.session.read().await.clone()
    }

    /// The instance URL of the current session.
    pub async fn instance_url(&self) -> String {
        self.inner.session.read().await.instance_url().to_string()
    }

    /// GET and decode into `T`. `Ok(None)` means the server sent 204 No Content.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Option<T>> {
        self.send(ApiRequest::new(Method::Get, path).with_params(params.iter().copied()))
            .await
    }

    /// POST a JSON payload and decode the response into `T`.
    pub async fn post<T, B>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        payload: &B,
    ) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = encode_payload(payload)?;
        self.send(
            ApiRequest::new(Method::Post, path)
                .with_params(params.iter().copied())
                .with_body(body),
        )
        .await
    }

    /// PATCH a JSON payload and decode the response into `T`.
    pub async fn patch<T, B>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        payload: &B,
    ) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = encode_payload(payload)?;
        self.send(
            ApiRequest::new(Method::Patch, path)
                .with_params(params.iter().copied())
                .with_body(body),
        )
        .await
    }

    /// PUT a JSON payload and decode the response into `T`.
    pub async fn put<T, B>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        payload: &B,
    ) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = encode_payload(payload)?;
        self.send(
            ApiRequest::new(Method::Put, path)
                .with_params(params.iter().copied())
                .with_body(body),
        )
        .await
    }

    /// DELETE. Success responses carry no body worth decoding, but an error
    /// body is still interpreted.
    pub async fn delete(&self, path: &str, params: &[(&str, &str)]) -> Result<()> {
        self.send_no_content(ApiRequest::new(Method::Delete, path).with_params(params.iter().copied()))
            .await
    }

    /// Dispatch a request and decode the response body into `T`.
    ///
    /// `Ok(None)` means 204 No Content. Decode priority: the target shape is
    /// tried first and a successful decode is returned immediately, so a
    /// payload that happens to also parse as an error collection is never
    /// misclassified. Only when the target decode fails is the body probed for
    /// a structured API error.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<Option<T>> {
        self.dispatch(request, true).await
    }

    /// Dispatch a request without a decode target. The error shape is still
    /// probed, since failures arrive as 200/400 bodies as often as statuses.
    pub async fn send_no_content(&self, request: ApiRequest) -> Result<()> {
        self.dispatch::<serde_json::Value>(request, false)
            .await
            .map(|_| ())
    }

    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn dispatch<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        decode: bool,
    ) -> Result<Option<T>> {
        let mut reauth_attempts = 0;

        loop {
            let (token, instance_url) = {
                let session = self.inner.session.read().await;
                if !session.is_valid() {
                    return Err(Error::new(ErrorKind::InvalidSession));
                }
                (
                    session.access_token().to_string(),
                    session.instance_url().to_string(),
                )
            };

            let url = build_url(&instance_url, &request)?;

            let content_type = request
                .content_type
                .as_deref()
                .unwrap_or(JSON_CONTENT_TYPE);

            let mut req = self
                .inner
                .http
                .request(request.method.to_reqwest(), url.as_str())
                .header("Accept", "application/json")
                .header("Content-Type", content_type)
                .header("X-SFDC-Session", &token)
                .bearer_auth(&token);

            if self.inner.config.accept_compressed {
                req = req.header("Accept-Encoding", "gzip, deflate");
            }

            if let Some(body) = &request.body {
                req = match body {
                    Body::Json(value) => req.json(value),
                    Body::Raw(text) => req.body(text.clone()),
                };
            }

            if self.inner.config.enable_tracing {
                debug!(method = %request.method, path = %request.path, "sending request");
            }

            // Transport-level failures are final; only an expired session is
            // ever replayed.
            let response = req.send().await?;
            let status = response.status();

            if self.inner.config.enable_tracing {
                debug!(status = status.as_u16(), "response received");
            }

            if status == reqwest::StatusCode::NO_CONTENT {
                return Ok(None);
            }

            // gzip/deflate bodies are decompressed by the transport.
            let bytes = response.bytes().await?;

            let decode_err = if decode {
                match serde_json::from_slice::<T>(&bytes) {
                    Ok(value) => return Ok(Some(value)),
                    Err(err) => Some(err),
                }
            } else {
                None
            };

            if let Some(errors) = probe_api_errors(&bytes) {
                if errors.is_valid() {
                    if errors.is_session_expired() && reauth_attempts < SESSION_RETRY_LIMIT {
                        if let Some(authenticator) = &self.inner.authenticator {
                            warn!("session expired; re-authenticating");
                            let fresh = authenticator.authenticate().await?;
                            *self.inner.session.write().await = fresh;
                            reauth_attempts += 1;
                            continue;
                        }
                    }
                    return Err(Error::new(ErrorKind::Api(errors)));
                }
            }

            return match decode_err {
                Some(err) => Err(Error::with_source(
                    ErrorKind::Decode(format!("unable to decode response body: {err}")),
                    err,
                )),
                None => Ok(None),
            };
        }
    }
}

fn build_http(config: &ClientConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .pool_idle_timeout(config.pool_idle_timeout)
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .user_agent(&config.user_agent);

    if config.accept_compressed {
        builder = builder.gzip(true).deflate(true);
    } else {
        builder = builder.gzip(false).deflate(false);
    }

    builder
        .build()
        .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))
}

fn build_url(instance_url: &str, request: &ApiRequest) -> Result<url::Url> {
    let base = url::Url::parse(instance_url)?;
    let mut url = base.join(&request.path)?;
    if !request.params.is_empty() {
        url.set_query(Some(&serde_urlencoded::to_string(&request.params)?));
    }
    Ok(url)
}

fn encode_payload<B: Serialize + ?Sized>(payload: &B) -> Result<Body> {
    let value = serde_json::to_value(payload)
        .map_err(|e| Error::with_source(ErrorKind::Serialization(e.to_string()), e))?;
    Ok(Body::Json(value))
}

/// Probe a response body for the Salesforce error shape: an array of error
/// entries, or the single-object form some async endpoints use.
fn probe_api_errors(bytes: &[u8]) -> Option<ApiErrors> {
    if let Ok(errors) = serde_json::from_slice::<ApiErrors>(bytes) {
        return Some(errors);
    }
    if let Ok(error) = serde_json::from_slice::<ApiError>(bytes) {
        return Some(ApiErrors(vec![error]));
    }
    None
}

use crate::client::CteraError::*;
use crate::devices::Devices;
use crate::files::Files;
use crate::pager::{Page, PageFetch, Paginated, Pager};
use crate::portals::Portals;
use crate::version::Version;
use crate::zones::Zones;
use anyhow::{Context, Result};
use log::debug;
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_API_PATH: &str = "/admin/api";
const DEFAULT_TIMEOUT_MS: u64 = 3000;

/// Custom error types for the [`CteraHost`] client
#[derive(Error, Debug)]
pub enum CteraError {
    #[error("CTERA API error: code={code}, message={message}")]
    Api { code: i32, message: String },

    #[error("Network request error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    InvalidResponse(String),

    #[error("Invalid input parameter: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Operation rejected: {0}")]
    Operation(String),

    #[error("Pagination protocol violation: {0}")]
    Protocol(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Request envelope for `execute` and `add` calls
#[derive(Serialize)]
struct Envelope<'a, P: ?Sized> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    param: Option<&'a P>,
}

/// CTERA management API client, usable against a Portal or an Edge Filer
pub struct CteraHost {
    host: String,
    api_path: String,
    version: Version,
    client: Client,
}

impl CteraHost {
    /// Creates a new `CteraHost` client for the given host with default API path and version
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Host URL is empty
    /// - Host URL doesn't start with "http://" or "https://"
    pub fn new(host: String, timeout_ms: u64) -> Result<Self> {
        Self::with_options(host, DEFAULT_API_PATH.into(), timeout_ms, Version::default())
    }

    fn with_options(
        host: String,
        api_path: String,
        timeout_ms: u64,
        version: Version,
    ) -> Result<Self> {
        if host.is_empty() {
            return Err(Configuration("Host URL cannot be empty".into()).into());
        }

        if !host.starts_with("http://") && !host.starts_with("https://") {
            return Err(Configuration(format!(
                "Host URL must start with http:// or https://, got: {host}"
            ))
            .into());
        }

        if !api_path.is_empty() && !api_path.starts_with('/') {
            return Err(Configuration(format!(
                "API path must be empty or start with '/', got: {api_path}"
            ))
            .into());
        }

        let host = host.trim_end_matches('/').to_string();
        let api_path = api_path.trim_end_matches('/').to_string();

        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .user_agent(version.as_header())
            .build()
            .map_err(Network)?;

        Ok(Self {
            host,
            api_path,
            version,
            client,
        })
    }

    /// Creates a new builder for [`CteraHost`]
    #[must_use]
    pub fn builder() -> CteraHostBuilder {
        CteraHostBuilder::default()
    }

    #[must_use]
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Base URL all request paths are appended to
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("{}{}", self.host, self.api_path)
    }

    #[must_use]
    pub fn zones(&self) -> Zones<'_> {
        Zones::new(self)
    }

    #[must_use]
    pub fn portals(&self) -> Portals<'_> {
        Portals::new(self)
    }

    #[must_use]
    pub fn devices(&self) -> Devices<'_> {
        Devices::new(self)
    }

    #[must_use]
    pub fn files(&self) -> Files<'_> {
        Files::new(self)
    }

    /// Reads the object stored at `path`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Network request fails
    /// - Server responds with a non-success status
    /// - Response cannot be parsed
    pub async fn get<R>(&self, path: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let response = self
            .dispatch::<()>(Method::GET, path, None)
            .await
            .with_context(|| format!("Failed to get {path}"))?;
        Self::parse(response).await
    }

    /// Replaces the object stored at `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the network request fails or the server responds with a non-success status
    pub async fn put<V>(&self, path: &str, value: &V) -> Result<()>
    where
        V: Serialize + ?Sized,
    {
        self.dispatch(Method::PUT, path, Some(value))
            .await
            .with_context(|| format!("Failed to put {path}"))?;
        Ok(())
    }

    /// Invokes the server-side method `name` on `path` with `param`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Network request fails
    /// - Server responds with a non-success status
    /// - Response cannot be parsed
    pub async fn execute<P, R>(&self, path: &str, name: &str, param: &P) -> Result<R>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let envelope = Envelope {
            kind: "user-defined",
            name: Some(name),
            param: Some(param),
        };
        let response = self
            .dispatch(Method::POST, path, Some(&envelope))
            .await
            .with_context(|| format!("Failed to execute {name}"))?;
        Self::parse(response).await
    }

    /// Invokes the server-side method `name` on `path` without a parameter
    ///
    /// # Errors
    ///
    /// Same as [`Self::execute()`]
    pub async fn execute_no_param<R>(&self, path: &str, name: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let envelope = Envelope::<()> {
            kind: "user-defined",
            name: Some(name),
            param: None,
        };
        let response = self
            .dispatch(Method::POST, path, Some(&envelope))
            .await
            .with_context(|| format!("Failed to execute {name}"))?;
        Self::parse(response).await
    }

    /// Adds `value` to the collection at `path`
    ///
    /// # Errors
    ///
    /// Same as [`Self::execute()`]
    pub async fn add<V, R>(&self, path: &str, value: &V) -> Result<R>
    where
        V: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let envelope = Envelope {
            kind: "add",
            name: None,
            param: Some(value),
        };
        let response = self
            .dispatch(Method::POST, path, Some(&envelope))
            .await
            .with_context(|| format!("Failed to add to {path}"))?;
        Self::parse(response).await
    }

    /// Wraps a paged listing endpoint into a [`PageFetch`] for use with [`Pager`]
    #[must_use]
    pub fn command<P, T>(&self, path: impl Into<String>, name: &'static str) -> Command<'_, P, T> {
        Command {
            host: self,
            path: path.into(),
            name,
            _marker: PhantomData,
        }
    }

    /// Builds a [`Pager`] over `name` on `path`, starting from `param`
    #[must_use]
    pub fn iterator<P, T>(
        &self,
        path: impl Into<String>,
        name: &'static str,
        param: P,
    ) -> Pager<Command<'_, P, T>>
    where
        P: Paginated + Serialize,
        T: DeserializeOwned,
    {
        Pager::new(self.command(path, name), param)
    }

    /// Sends a request and fails on non-success status
    async fn dispatch<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url(), path);
        debug!("Making {method} request to: {url}");

        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(Network)
            .context("Failed to make API request")?;

        debug!("API request status: {}", response.status());

        let status = response.status();
        if !status.is_success() {
            return Err(Api {
                code: i32::from(status.as_u16()),
                message: format!(
                    "HTTP request failed with status: {} ({})",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            }
            .into());
        }

        Ok(response)
    }

    async fn parse<R>(response: Response) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let body = response
            .bytes()
            .await
            .map_err(Network)
            .context("Failed to read API response")?;
        serde_json::from_slice::<R>(&body)
            .map_err(|e| InvalidResponse(e.to_string()))
            .context("Failed to parse API response")
    }
}

/// A listing endpoint bound to a [`CteraHost`], fetching one [`Page`] per call
pub struct Command<'a, P, T> {
    host: &'a CteraHost,
    path: String,
    name: &'static str,
    _marker: PhantomData<fn(P) -> T>,
}

impl<P, T> PageFetch for Command<'_, P, T>
where
    P: Paginated + Serialize,
    T: DeserializeOwned,
{
    type Param = P;
    type Item = T;

    async fn fetch(&mut self, param: &P) -> Result<Page<T>> {
        debug!(
            "Fetching page. method: {}, start: {}",
            self.name,
            param.offset()
        );
        self.host.execute(&self.path, self.name, param).await
    }
}

/// Builder for [`CteraHost`] client
#[derive(Default)]
pub struct CteraHostBuilder {
    host: Option<String>,
    api_path: Option<String>,
    timeout: Option<u64>,
    version: Option<Version>,
}

impl CteraHostBuilder {
    /// Sets the host URL
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the API path prefix, `/admin/api` by default
    #[must_use]
    pub fn api_path(mut self, api_path: impl Into<String>) -> Self {
        self.api_path = Some(api_path.into());
        self
    }

    /// Sets the request timeout in milliseconds
    #[must_use]
    pub fn timeout(mut self, timeout_millis: u64) -> Self {
        self.timeout = Some(timeout_millis);
        self
    }

    /// Sets the client identification sent as `User-Agent`
    #[must_use]
    pub fn version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    /// Builds the [`CteraHost`] client
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Host is not provided
    /// - Host URL doesn't start with "http://" or "https://"
    /// - API path is neither empty nor starts with '/'
    pub fn build(self) -> Result<CteraHost> {
        let host = self
            .host
            .ok_or_else(|| Configuration("Host URL is required".into()))?;
        let api_path = self.api_path.unwrap_or_else(|| DEFAULT_API_PATH.into());
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT_MS);
        let version = self.version.unwrap_or_default();

        CteraHost::with_options(host, api_path, timeout, version)
    }
}

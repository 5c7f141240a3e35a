//! Authenticated HTTP session
//!
//! A [`Session`] is the unauthenticated half of the client: a blocking
//! `reqwest` client carrying the `X-API-Token` header and a base URL rooted
//! at `api/v1/`. Building one performs no I/O. [`crate::client::IpfClient`]
//! layers the version check and snapshot catalog on top.

use crate::columns::{parse_column_list, WILDCARD_COLUMN};
use crate::config::Config;
use crate::endpoint::{api_base, normalize_endpoint};
use crate::error::{IpfError, Result};
use crate::pager::PageSource;
use crate::snapshot::{Snapshot, SnapshotCatalog};
use crate::types::{ErrorEnvelope, Page, Row, TableRequest, VersionResponse};

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;

/// Header carrying the API token on every request
pub const TOKEN_HEADER: &str = "X-API-Token";

/// Transport options for a [`Session`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Per-request timeout
    pub timeout: Duration,
    /// Verify the server TLS certificate
    pub verify_tls: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            verify_tls: true,
        }
    }
}

/// Body for a raw table query
#[derive(Debug, Clone, PartialEq)]
pub enum QueryBody {
    /// JSON value serialized as the request body
    Json(Value),
    /// Pre-serialized JSON text sent as-is
    Text(String),
}

/// HTTP session bound to one API instance and token
#[derive(Debug, Clone)]
pub struct Session {
    client: Client,
    base_url: Url,
}

impl Session {
    /// Create a session without contacting the server
    ///
    /// # Errors
    ///
    /// Returns [`IpfError::Config`] if the base URL does not parse or the
    /// token contains characters not allowed in a header.
    ///
    /// # Examples
    ///
    /// ```
    /// use ipfabric_client::session::{Session, SessionOptions};
    ///
    /// let session = Session::new("https://ipf.example.com", "token", SessionOptions::default()).unwrap();
    /// assert_eq!(session.base_url().as_str(), "https://ipf.example.com/api/v1/");
    /// ```
    pub fn new(base_url: &str, token: &str, options: SessionOptions) -> Result<Self> {
        let base_url = api_base(base_url)
            .map_err(|e| IpfError::Config(format!("Invalid base URL '{}': {}", base_url, e)))?;

        let mut token_value = HeaderValue::from_str(token)
            .map_err(|_| IpfError::Config("API token is not a valid header value".to_string()))?;
        token_value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        let token_header = HeaderName::from_bytes(TOKEN_HEADER.as_bytes())
            .map_err(|e| IpfError::Config(format!("Invalid token header name: {}", e)))?;
        headers.insert(token_header, token_value);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if !options.verify_tls {
            tracing::warn!("TLS certificate verification disabled for {}", base_url);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(options.timeout)
            .danger_accept_invalid_certs(!options.verify_tls)
            .user_agent(concat!("ipfabric-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| IpfError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Create a session from validated configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let (url, token) = config.credentials()?;
        Self::new(
            url,
            token,
            SessionOptions {
                timeout: Duration::from_secs(config.timeout_seconds),
                verify_tls: config.verify_tls,
            },
        )
    }

    /// Versioned API root every request path resolves against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for an endpoint in any accepted form
    pub fn url(&self, endpoint: &str) -> Result<Url> {
        let path = normalize_endpoint(endpoint);
        self.base_url.join(&path).map_err(|e| {
            IpfError::InvalidArgument(format!("Invalid endpoint '{}': {}", endpoint, e)).into()
        })
    }

    /// Fetch the server OS version
    ///
    /// Used as the credential check: an unreachable server or a rejected
    /// token gives [`IpfError::Connection`], a success without a `version`
    /// field gives [`IpfError::InvalidResponse`].
    pub fn os_version(&self) -> Result<String> {
        let url = self.url("os/version")?;
        tracing::debug!("Fetching OS version from {}", url);

        let response = self.client.get(url.clone()).send().map_err(|e| {
            tracing::warn!("Failed to reach {}: {}", url, e);
            IpfError::Connection(format!(
                "Failed to reach {}: {}. Verify URL and token are correct",
                url, e
            ))
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("Version check returned {}", status);
            return Err(IpfError::Connection(format!(
                "Version check returned {}. Verify URL and token are correct",
                status
            ))
            .into());
        }

        let body: VersionResponse = response.json().map_err(|e| {
            IpfError::InvalidResponse(format!("Failed to parse OS version response: {}", e))
        })?;

        body.version.ok_or_else(|| {
            IpfError::InvalidResponse("OS version response has no version field".to_string())
                .into()
        })
    }

    /// Fetch the full snapshot listing in server order
    pub fn list_snapshots(&self) -> Result<SnapshotCatalog> {
        let url = self.url("snapshots")?;
        tracing::debug!("Fetching snapshots from {}", url);

        let response = check_status(self.client.get(url).send().map_err(IpfError::from)?)?;
        let snapshots: Vec<Snapshot> = response.json().map_err(|e| {
            IpfError::InvalidResponse(format!("Failed to parse snapshot listing: {}", e))
        })?;

        Ok(SnapshotCatalog::new(snapshots))
    }

    /// Discover the native column names of a table endpoint
    ///
    /// Posts a wildcard column selector, which the server rejects with 422
    /// and a message listing the valid columns.
    ///
    /// # Errors
    ///
    /// - [`IpfError::Status`] on any other error status, with the body
    /// - [`IpfError::Protocol`] on a success response, or a 422 whose body
    ///   does not carry a parsable column list
    pub fn discover_columns(&self, endpoint: &str, snapshot_id: &str) -> Result<Vec<String>> {
        let url = self.url(endpoint)?;
        tracing::debug!("Discovering columns for {}", url);

        let body = json!({ "snapshot": snapshot_id, "columns": [WILDCARD_COLUMN] });
        let response = self
            .client
            .post(url.clone())
            .json(&body)
            .send()
            .map_err(IpfError::from)?;
        let status = response.status();

        if status == StatusCode::UNPROCESSABLE_ENTITY {
            let envelope: ErrorEnvelope = response.json().map_err(|e| {
                IpfError::Protocol(format!("Column discovery error body unreadable: {}", e))
            })?;
            let message = envelope
                .errors
                .into_iter()
                .next()
                .and_then(|e| e.message)
                .ok_or_else(|| {
                    IpfError::Protocol("Column discovery error has no message".to_string())
                })?;
            return parse_column_list(&message);
        }

        let response = check_status(response)?;
        let body = response.text().unwrap_or_default();
        tracing::error!("Column discovery against {} returned {}", url, status);
        Err(IpfError::Protocol(format!(
            "Column discovery expected 422 from {}, got {}: {}",
            url, status, body
        ))
        .into())
    }

    /// Post a caller-supplied body and return its `data` rows untouched
    pub fn query(&self, endpoint: &str, body: QueryBody) -> Result<Vec<Row>> {
        let url = self.url(endpoint)?;
        tracing::debug!("Posting raw query to {}", url);

        let request = match body {
            QueryBody::Json(value) => self.client.post(url.clone()).json(&value),
            QueryBody::Text(text) => self.client.post(url.clone()).body(text),
        };
        let response = check_status(request.send().map_err(IpfError::from)?)?;
        let value: Value = response.json().map_err(|e| {
            IpfError::InvalidResponse(format!("Failed to parse response from {}: {}", url, e))
        })?;

        rows_from_value(value).ok_or_else(|| {
            IpfError::InvalidResponse(format!("Response from {} has no data rows", url)).into()
        })
    }
}

impl PageSource for Session {
    fn fetch_page(&self, endpoint: &str, request: &TableRequest) -> Result<Page> {
        let url = self.url(endpoint)?;
        let response = self
            .client
            .post(url.clone())
            .json(request)
            .send()
            .map_err(IpfError::from)?;
        let response = check_status(response)?;
        response.json::<Page>().map_err(|e| {
            IpfError::InvalidResponse(format!("Failed to parse page from {}: {}", url, e)).into()
        })
    }
}

/// Turn a non-success response into [`IpfError::Status`]
fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let body = response.text().unwrap_or_default();
    tracing::error!("{} returned {}: {}", url, status, body);
    Err(IpfError::Status {
        status: status.as_u16(),
        url,
        body,
    }
    .into())
}

/// Extract `data` as a list of row objects
fn rows_from_value(value: Value) -> Option<Vec<Row>> {
    let Value::Object(mut body) = value else {
        return None;
    };
    match body.remove("data")? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(row) => Some(row),
                _ => None,
            })
            .collect(),
        _ => None,
    }
}

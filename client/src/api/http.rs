use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Error carried by every failed API call.
///
/// `status` is the HTTP status of the response, or 0 when the request
/// never produced a usable response: connect failure, timeout, DNS, or a
/// body that was not valid JSON.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

impl ApiError {
    /// An error derived from a non-success HTTP response.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// A network-class error (transport failure or undecodable body).
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: 0,
            message: message.into(),
        }
    }

    pub fn is_transport(&self) -> bool {
        self.status == 0
    }
}

/// Shape of the service's JSON error bodies.
#[derive(serde::Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Thin HTTP client bound to the service's API base URL.
///
/// All resource modules go through [`ApiClient::request`], which owns the
/// error normalization: every failure, transport or HTTP, comes back as a
/// single [`ApiError`] shape.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// The underlying reqwest client, for requests that don't fit the JSON
    /// convention (multipart uploads).
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Send a request and decode the JSON response.
    ///
    /// Caller-supplied headers are merged over a default
    /// `Content-Type: application/json`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        headers: HeaderMap,
        body: Option<&serde_json::Value>,
    ) -> Result<T, ApiError> {
        let mut merged = HeaderMap::new();
        merged.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        merged.extend(headers);

        let mut req = self.http.request(method, self.url(path)).headers(merged);
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| ApiError::transport(format!("network error: {e}")))?;
        read_json(resp).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::GET, path, HeaderMap::new(), None).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, ApiError> {
        self.request(Method::POST, path, HeaderMap::new(), Some(body))
            .await
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, ApiError> {
        self.request(Method::PUT, path, HeaderMap::new(), Some(body))
            .await
    }

    /// DELETE a resource. The service responds with a JSON acknowledgment
    /// which callers have no use for, so it is decoded and discarded.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .request(Method::DELETE, path, HeaderMap::new(), None)
            .await?;
        Ok(())
    }
}

/// Decode a response, mapping non-success statuses to [`ApiError`].
///
/// On a non-2xx status the JSON error body's `error` field becomes the
/// message, falling back to `HTTP {status}` when the body is absent or
/// unparseable. A success body that is not valid JSON is a
/// network-class error (status 0).
pub(crate) async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
    let status = resp.status();
    if !status.is_success() {
        let message = resp
            .bytes()
            .await
            .ok()
            .and_then(|b| serde_json::from_slice::<ErrorBody>(&b).ok())
            .and_then(|b| b.error)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        return Err(ApiError::http(status.as_u16(), message));
    }

    let bytes = resp
        .bytes()
        .await
        .map_err(|e| ApiError::transport(format!("failed to read response body: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::transport(format!("invalid JSON in response: {e}")))
}

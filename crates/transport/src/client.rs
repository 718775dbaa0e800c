//! Up2Share API client.
//!
//! Async HTTP client using `reqwest` with API key or Bearer token
//! authentication.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, error};

use crate::config::ClientConfig;
use crate::request::{Request, Response};
use crate::TransportError;

const API_KEY_HEADER: &str = "x-api-key";

/// Future returned by [`Transport::request`].
pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = Option<Response>> + Send + 'a>>;

/// Abstract request interface.
///
/// [`ApiClient`] is the real implementation; the upload and file crates
/// depend only on this trait so they can be exercised against mocks.
pub trait Transport: Send + Sync {
    /// Sends a request.
    ///
    /// Resolves to `None` when no response was obtained (connection failure,
    /// timeout, unreadable body). Any HTTP status, including 3xx and 4xx, is
    /// a present response.
    fn request(&self, request: Request) -> TransportFuture<'_>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn request(&self, request: Request) -> TransportFuture<'_> {
        (**self).request(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn request(&self, request: Request) -> TransportFuture<'_> {
        (**self).request(request)
    }
}

/// Up2Share API client.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    base_headers: HeaderMap,
}

impl ApiClient {
    /// Creates a client from `config`.
    ///
    /// Fails if the base URL does not parse or a credential is not a valid
    /// header value.
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        reqwest::Url::parse(&config.base_url)
            .map_err(|e| TransportError::InvalidBaseUrl(format!("{}: {e}", config.base_url)))?;

        let base_headers = build_base_headers(&config)?;

        // 308 is a protocol signal for resumable uploads, never follow it.
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            http,
            config,
            base_headers,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Headers attached to every request before extra headers are merged in.
    pub fn base_headers(&self) -> &HeaderMap {
        &self.base_headers
    }

    /// Sends a request, logging and swallowing transport failures.
    pub async fn send(&self, request: Request) -> Option<Response> {
        let url = resolve_url(&self.config.base_url, &request.endpoint);
        let method = request.method.clone();

        let headers = match merge_headers(&self.base_headers, &request.headers) {
            Ok(h) => h,
            Err(e) => {
                error!(%method, %url, error = %e, "invalid request header");
                return None;
            }
        };

        let mut builder = self
            .http
            .request(method.clone(), &url)
            .headers(headers)
            .timeout(self.config.timeout());
        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        debug!(%method, %url, "sending request");
        let resp = match builder.send().await {
            Ok(r) => r,
            Err(e) => {
                error!(%method, %url, error = %e, "request failed");
                return None;
            }
        };

        let status = resp.status().as_u16();
        let headers = resp.headers().clone();
        let body = match resp.bytes().await {
            Ok(b) => b.to_vec(),
            Err(e) => {
                error!(%method, %url, status, error = %e, "failed to read response body");
                return None;
            }
        };

        debug!(%method, %url, status, bytes = body.len(), "response received");
        Some(Response::new(status, headers, body))
    }

    pub async fn get(
        &self,
        endpoint: &str,
        headers: &[(&str, &str)],
        params: &[(&str, &str)],
    ) -> Option<Response> {
        self.send(build(Method::GET, endpoint, headers, None, params))
            .await
    }

    pub async fn post(
        &self,
        endpoint: &str,
        headers: &[(&str, &str)],
        body: Option<Vec<u8>>,
    ) -> Option<Response> {
        self.send(build(Method::POST, endpoint, headers, body, &[]))
            .await
    }

    pub async fn put(
        &self,
        endpoint: &str,
        headers: &[(&str, &str)],
        body: Option<Vec<u8>>,
    ) -> Option<Response> {
        self.send(build(Method::PUT, endpoint, headers, body, &[]))
            .await
    }

    pub async fn delete(&self, endpoint: &str, headers: &[(&str, &str)]) -> Option<Response> {
        self.send(build(Method::DELETE, endpoint, headers, None, &[]))
            .await
    }
}

fn build(
    method: Method,
    endpoint: &str,
    headers: &[(&str, &str)],
    body: Option<Vec<u8>>,
    params: &[(&str, &str)],
) -> Request {
    let mut request = Request::new(method, endpoint);
    for (name, value) in headers {
        request = request.with_header(*name, *value);
    }
    for (name, value) in params {
        request = request.with_param(*name, *value);
    }
    request.body = body;
    request
}

impl Transport for ApiClient {
    fn request(&self, request: Request) -> TransportFuture<'_> {
        Box::pin(self.send(request))
    }
}

/// Joins `endpoint` to `base_url`; absolute `http(s)://` URIs pass through.
pub fn resolve_url(base_url: &str, endpoint: &str) -> String {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        return endpoint.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

/// Builds `Accept` plus one credential header. The API key wins over the
/// OAuth token when both are configured.
fn build_base_headers(config: &ClientConfig) -> Result<HeaderMap, TransportError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let api_key = config.api_key.as_deref().filter(|k| !k.is_empty());
    let oauth_token = config.oauth_token.as_deref().filter(|t| !t.is_empty());

    if let Some(key) = api_key {
        let mut value =
            HeaderValue::from_str(key).map_err(|_| TransportError::InvalidCredential("API key"))?;
        value.set_sensitive(true);
        headers.insert(HeaderName::from_static(API_KEY_HEADER), value);
    } else if let Some(token) = oauth_token {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| TransportError::InvalidCredential("OAuth token"))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}

fn merge_headers(base: &HeaderMap, extra: &[(String, String)]) -> Result<HeaderMap, String> {
    let mut headers = base.clone();
    for (name, value) in extra {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| format!("{name}: {e}"))?;
        let value =
            HeaderValue::from_str(value).map_err(|e| format!("{}: {e}", name.as_str()))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

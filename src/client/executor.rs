//! Request executor: RSID binding, dispatch and error mapping.

use crate::errors::{AnalyticsError, AnalyticsResult, RequestError, ResponseError};
use crate::transport::{HttpMethod, HttpRequest, HttpTransport};
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Dispatches GET and POST requests against the Analytics API.
///
/// Every request gets the report suite id appended as the `rsid` query
/// parameter. There is no retry: a transport failure or non-2xx status is
/// returned to the caller as a [`RequestError`].
pub struct RequestExecutor {
    transport: Arc<dyn HttpTransport>,
    rsid: String,
    timeout: Option<Duration>,
}

impl RequestExecutor {
    /// Creates a new request executor.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        rsid: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            transport,
            rsid: rsid.into(),
            timeout,
        }
    }

    /// Report suite id appended to every request.
    pub fn rsid(&self) -> &str {
        &self.rsid
    }

    /// Appends `rsid` to `endpoint`, using `?` or `&` as appropriate.
    pub fn append_rsid(endpoint: &str, rsid: &str) -> String {
        let separator = if endpoint.contains('?') { '&' } else { '?' };
        let encoded: String = url::form_urlencoded::byte_serialize(rsid.as_bytes()).collect();
        format!("{}{}rsid={}", endpoint, separator, encoded)
    }

    /// Resolves `endpoint` (with the RSID appended) against `base`.
    ///
    /// Endpoints are relative paths; absolute URLs and paths that climb out
    /// of `base` are rejected.
    pub fn build_url(&self, base: &Url, endpoint: &str) -> AnalyticsResult<Url> {
        let relative = endpoint.trim_start_matches('/');
        if Url::parse(relative).is_ok() {
            return Err(RequestError::InvalidUrl(format!(
                "endpoint must be relative to {}: {}",
                base, endpoint
            ))
            .into());
        }

        let endpoint = Self::append_rsid(relative, &self.rsid);
        let url = base
            .join(&endpoint)
            .map_err(|e| RequestError::InvalidUrl(format!("{}{}: {}", base, endpoint, e)))?;

        if !url.as_str().starts_with(base.as_str()) {
            return Err(RequestError::InvalidUrl(format!(
                "endpoint {} resolves outside {}",
                endpoint, base
            ))
            .into());
        }

        Ok(url)
    }

    /// Issues a GET and decodes the JSON body.
    pub async fn get(
        &self,
        base: &Url,
        endpoint: &str,
        headers: HeaderMap,
    ) -> AnalyticsResult<Value> {
        self.execute(HttpMethod::Get, base, endpoint, headers, None::<&()>)
            .await
    }

    /// Issues a POST with a JSON body and decodes the JSON response.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        base: &Url,
        endpoint: &str,
        headers: HeaderMap,
        body: &B,
    ) -> AnalyticsResult<Value> {
        self.execute(HttpMethod::Post, base, endpoint, headers, Some(body))
            .await
    }

    /// Executes a request and deserializes the JSON response.
    pub async fn execute<T, B>(
        &self,
        method: HttpMethod,
        base: &Url,
        endpoint: &str,
        mut headers: HeaderMap,
        body: Option<&B>,
    ) -> AnalyticsResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.build_url(base, endpoint)?;

        let body = match body {
            Some(body) => {
                let bytes = serde_json::to_vec(body)
                    .map_err(|e| RequestError::Encoding(e.to_string()))?;
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                Some(Bytes::from(bytes))
            }
            None => None,
        };

        debug!(method = %method, url = %url, "Sending analytics request");

        let response = self
            .transport
            .send(HttpRequest {
                method,
                url: url.clone(),
                headers,
                body,
                timeout: self.timeout,
            })
            .await
            .map_err(|e| RequestError::Transport {
                method: method.to_string(),
                url: url.to_string(),
                message: e.to_string(),
            })?;

        if !response.status.is_success() {
            warn!(method = %method, url = %url, status = %response.status, "Analytics request failed");
            return Err(AnalyticsError::Request(RequestError::Status {
                method: method.to_string(),
                url: url.to_string(),
                status: response.status,
                body: response.text(),
            }));
        }

        let payload: &[u8] = if response.body.is_empty() {
            b"null"
        } else {
            &response.body
        };

        serde_json::from_slice(payload).map_err(|e| {
            ResponseError::DeserializationError(format!(
                "Failed to deserialize response from {}: {}",
                url, e
            ))
            .into()
        })
    }
}

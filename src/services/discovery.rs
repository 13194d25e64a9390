//! Discovery listings: report suites, segments, dimensions, metrics, projects.

use crate::client::AnalyticsClient;
use crate::errors::{AnalyticsResult, RequestError};
use crate::types::{LimitParams, ListParams};
use serde::Serialize;
use serde_json::Value;

/// Service for the paginated discovery endpoints.
///
/// Responses are returned as decoded JSON; following further pages is up to
/// the caller.
pub struct DiscoveryService<'a> {
    client: &'a AnalyticsClient,
}

impl<'a> DiscoveryService<'a> {
    /// Creates a new discovery service.
    pub fn new(client: &'a AnalyticsClient) -> Self {
        Self { client }
    }

    /// Lists report suites.
    pub async fn report_suites(&self, params: Option<ListParams>) -> AnalyticsResult<Value> {
        self.list("collections/suites", &params.unwrap_or_default())
            .await
    }

    /// Lists segments.
    pub async fn segments(&self, params: Option<ListParams>) -> AnalyticsResult<Value> {
        self.list("segments", &params.unwrap_or_default()).await
    }

    /// Lists dimensions.
    pub async fn dimensions(&self, params: Option<LimitParams>) -> AnalyticsResult<Value> {
        self.list("dimensions", &params.unwrap_or_default()).await
    }

    /// Lists metrics.
    pub async fn metrics(&self, params: Option<LimitParams>) -> AnalyticsResult<Value> {
        self.list("metrics", &params.unwrap_or_default()).await
    }

    /// Lists workspace projects.
    pub async fn projects(&self, params: Option<ListParams>) -> AnalyticsResult<Value> {
        self.list("project", &params.unwrap_or_default()).await
    }

    async fn list<P: Serialize>(&self, path: &str, params: &P) -> AnalyticsResult<Value> {
        let query = serde_urlencoded::to_string(params)
            .map_err(|e| RequestError::Encoding(e.to_string()))?;
        self.client.get(&format!("{}?{}", path, query), None).await
    }
}

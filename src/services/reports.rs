//! Reports service: ad hoc reports and workspace imports.

use crate::client::AnalyticsClient;
use crate::errors::AnalyticsResult;
use crate::reports::{ReportQuery, ReportTable};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;

/// Endpoint accepting report queries.
pub const REPORTS_ENDPOINT: &str = "reports";

/// A workspace query, given inline or as a path to its JSON export.
#[derive(Debug, Clone)]
pub enum WorkspaceSource {
    /// Already-parsed query.
    Query(ReportQuery),
    /// Path to a JSON file holding the query.
    Path(PathBuf),
}

impl WorkspaceSource {
    /// Resolves the source into a query, reading the file if needed.
    pub fn load(self) -> AnalyticsResult<ReportQuery> {
        match self {
            WorkspaceSource::Query(query) => Ok(query),
            WorkspaceSource::Path(path) => Ok(ReportQuery::from_path(path)?),
        }
    }
}

impl From<ReportQuery> for WorkspaceSource {
    fn from(query: ReportQuery) -> Self {
        WorkspaceSource::Query(query)
    }
}

impl From<PathBuf> for WorkspaceSource {
    fn from(path: PathBuf) -> Self {
        WorkspaceSource::Path(path)
    }
}

impl From<&Path> for WorkspaceSource {
    fn from(path: &Path) -> Self {
        WorkspaceSource::Path(path.to_path_buf())
    }
}

/// Service for the `reports` endpoint.
pub struct ReportsService<'a> {
    client: &'a AnalyticsClient,
}

impl<'a> ReportsService<'a> {
    /// Creates a new reports service.
    pub fn new(client: &'a AnalyticsClient) -> Self {
        Self { client }
    }

    /// Runs a report over the session's date range.
    ///
    /// Requires a prior [`AnalyticsClient::set_date_range`].
    pub async fn get_report<S: AsRef<str>>(
        &self,
        metrics: &[S],
        dimension: &str,
        segment_id: Option<&str>,
    ) -> AnalyticsResult<Value> {
        let query = self
            .client
            .build_report_query(metrics, dimension, segment_id)?;
        self.run(&query).await
    }

    /// Runs a report and shapes the response as a table.
    pub async fn get_report_table<S: AsRef<str>>(
        &self,
        metrics: &[S],
        dimension: &str,
        segment_id: Option<&str>,
    ) -> AnalyticsResult<ReportTable> {
        let query = self
            .client
            .build_report_query(metrics, dimension, segment_id)?;
        let response = self.run(&query).await?;
        Ok(ReportTable::from_response(&query, &response)?)
    }

    /// Posts an already-built query.
    pub async fn run(&self, query: &ReportQuery) -> AnalyticsResult<Value> {
        self.client.post(REPORTS_ENDPOINT, None, query).await
    }

    /// Posts a query exported from Analysis Workspace.
    pub async fn from_workspace(
        &self,
        source: impl Into<WorkspaceSource>,
    ) -> AnalyticsResult<Value> {
        let query = source.into().load()?;

        info!(
            metrics = query.metric_count(),
            rsid = %query.rsid,
            "Pulling report from workspace query"
        );

        self.run(&query).await
    }
}

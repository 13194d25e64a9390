//! Report query model and construction.
//!
//! A [`ReportQuery`] is the body posted to the `reports` endpoint. Queries
//! are either built from a metric list, a dimension and the session's date
//! range, or loaded from a workspace export (the JSON shown by the Analysis
//! Workspace debugger). Fields this crate does not model are preserved, and
//! empty filter, metric and settings blocks are left out, so a loaded
//! workspace query posts back unchanged.

mod metric_names;
mod table;

pub use metric_names::{metric_name, metric_names, metric_names_from_json};
pub use table::{ReportRow, ReportTable};

use crate::errors::ValidationError;
use crate::session::DateRange;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Global filter type for date ranges.
pub const DATE_RANGE_FILTER: &str = "dateRange";

/// Ascending dimension sort.
pub const DIMENSION_SORT_ASC: &str = "asc";

/// Row limit applied to built queries.
pub const DEFAULT_ROW_LIMIT: u32 = 50_000;

/// Body of a `POST reports` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    /// Report suite id.
    pub rsid: String,

    /// Filters applied to the whole report.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub global_filters: Vec<GlobalFilter>,

    /// Requested metrics.
    pub metric_container: MetricContainer,

    /// Dimension the rows are broken down by.
    pub dimension: String,

    /// Sort and paging settings.
    #[serde(default, skip_serializing_if = "ReportSettings::is_empty")]
    pub settings: ReportSettings,

    /// Unmodelled fields, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ReportQuery {
    /// Builds a query over `date_range`.
    ///
    /// Metric `i` gets column id `i`; rows sort ascending by dimension with a
    /// limit of 50000.
    pub fn build<S: AsRef<str>>(
        rsid: impl Into<String>,
        date_range: &DateRange,
        metrics: &[S],
        dimension: impl Into<String>,
        segment_id: Option<&str>,
    ) -> Result<Self, ValidationError> {
        if metrics.is_empty() {
            return Err(ValidationError::NoMetrics);
        }

        let metrics = metrics
            .iter()
            .enumerate()
            .map(|(idx, id)| ReportMetric::new(idx as u32, id.as_ref()))
            .collect();

        Ok(Self {
            rsid: rsid.into(),
            global_filters: vec![GlobalFilter::date_range(date_range, segment_id)],
            metric_container: MetricContainer {
                metrics,
                extra: Map::new(),
            },
            dimension: dimension.into(),
            settings: ReportSettings {
                dimension_sort: Some(DIMENSION_SORT_ASC.to_string()),
                limit: Some(DEFAULT_ROW_LIMIT),
                ..ReportSettings::default()
            },
            extra: Map::new(),
        })
    }

    /// Parses a workspace query from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json).map_err(|e| ValidationError::MalformedWorkspace(e.to_string()))
    }

    /// Loads a workspace query from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ValidationError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::MalformedWorkspace(format!("{}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Number of requested metrics.
    pub fn metric_count(&self) -> usize {
        self.metric_container.metrics.len()
    }

    /// Display names of the requested metrics, in column order.
    pub fn metric_names(&self) -> Vec<String> {
        metric_names(&self.metric_container)
    }
}

/// Report-wide filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalFilter {
    /// Filter type, e.g. `dateRange` or `segment`.
    #[serde(rename = "type")]
    pub filter_type: String,

    /// Formatted date range for `dateRange` filters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<String>,

    /// Segment applied alongside the filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_id: Option<String>,

    /// Unmodelled fields, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GlobalFilter {
    /// A `dateRange` filter, optionally restricted to a segment.
    pub fn date_range(range: &DateRange, segment_id: Option<&str>) -> Self {
        Self {
            filter_type: DATE_RANGE_FILTER.to_string(),
            date_range: Some(range.format()),
            segment_id: segment_id.map(str::to_string),
            extra: Map::new(),
        }
    }
}

/// The metrics of a query, in column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricContainer {
    /// Requested metrics.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metrics: Vec<ReportMetric>,

    /// Unmodelled fields (e.g. `metricFilters`), kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Column identifier: built queries use indices, workspace exports often
/// use strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnId {
    /// Positional column id.
    Index(u32),
    /// Named column id.
    Name(String),
}

/// One requested metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetric {
    /// Column the metric's values land in.
    pub column_id: ColumnId,

    /// Metric id, conventionally `namespace/name`.
    pub id: String,

    /// Unmodelled fields (e.g. `filters`, `sort`), kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ReportMetric {
    /// Creates a metric at a positional column.
    pub fn new(column: u32, id: impl Into<String>) -> Self {
        Self {
            column_id: ColumnId::Index(column),
            id: id.into(),
            extra: Map::new(),
        }
    }
}

/// Report settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSettings {
    /// Dimension sort direction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension_sort: Option<String>,

    /// Row limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    /// Zero-based page of rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Unmodelled fields, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ReportSettings {
    /// True when no setting is present.
    pub fn is_empty(&self) -> bool {
        self.dimension_sort.is_none()
            && self.limit.is_none()
            && self.page.is_none()
            && self.extra.is_empty()
    }
}

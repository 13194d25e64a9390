//! Display names for report metrics.

use super::MetricContainer;
use crate::errors::ResponseError;
use serde_json::Value;

/// Display name of the metric at `index`.
///
/// `namespace/name` ids yield everything after the first `/`; ids without a
/// namespace are prefixed with their position to keep names unique.
pub fn metric_name(index: usize, id: &str) -> String {
    match id.split_once('/') {
        Some((_, name)) => name.to_string(),
        None => format!("{}-{}", index, id),
    }
}

/// Display names of a container's metrics, in column order.
pub fn metric_names(container: &MetricContainer) -> Vec<String> {
    container
        .metrics
        .iter()
        .enumerate()
        .map(|(idx, metric)| metric_name(idx, &metric.id))
        .collect()
}

/// Display names read from a raw JSON body's `metricContainer.metrics`.
pub fn metric_names_from_json(body: &Value) -> Result<Vec<String>, ResponseError> {
    let metrics = body
        .pointer("/metricContainer/metrics")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            ResponseError::UnexpectedFormat("metricContainer.metrics is missing".to_string())
        })?;

    metrics
        .iter()
        .enumerate()
        .map(|(idx, metric)| {
            metric
                .get("id")
                .and_then(Value::as_str)
                .map(|id| metric_name(idx, id))
                .ok_or_else(|| {
                    ResponseError::UnexpectedFormat(format!("metric {} has no string id", idx))
                })
        })
        .collect()
}

//! Tabular view of a report response.

use super::ReportQuery;
use crate::errors::ResponseError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A report response shaped as a table.
///
/// `columns[0]` is the dimension id; the remaining columns are the metric
/// display names in column order. Each row holds the dimension value and one
/// cell per metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportTable {
    /// Column headers.
    pub columns: Vec<String>,
    /// Rows, in response order.
    pub rows: Vec<ReportRow>,
}

/// One row of a [`ReportTable`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    /// Dimension item id.
    pub item_id: Option<String>,
    /// Dimension value.
    pub value: String,
    /// Metric values; `None` where the API returned null.
    pub data: Vec<Option<f64>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReport {
    rows: Vec<RawRow>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRow {
    #[serde(default)]
    item_id: Option<String>,
    #[serde(default)]
    value: Value,
    #[serde(default)]
    data: Vec<Option<f64>>,
}

impl ReportTable {
    /// Shapes `response` using the metric names of the `query` that produced it.
    pub fn from_response(query: &ReportQuery, response: &Value) -> Result<Self, ResponseError> {
        let raw = RawReport::deserialize(response)
            .map_err(|e| ResponseError::UnexpectedFormat(format!("report rows: {}", e)))?;

        let metric_names = query.metric_names();
        let width = metric_names.len();

        let rows = raw
            .rows
            .into_iter()
            .enumerate()
            .map(|(idx, row)| {
                if row.data.len() != width {
                    return Err(ResponseError::UnexpectedFormat(format!(
                        "row {} has {} values, expected {}",
                        idx,
                        row.data.len(),
                        width
                    )));
                }

                let value = match row.value {
                    Value::String(s) => s,
                    Value::Null => String::new(),
                    other => other.to_string(),
                };

                Ok(ReportRow {
                    item_id: row.item_id,
                    value,
                    data: row.data,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut columns = Vec::with_capacity(width + 1);
        columns.push(query.dimension.clone());
        columns.extend(metric_names);

        Ok(Self { columns, rows })
    }

    /// Values of the metric column named `name`.
    pub fn metric_column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let position = self.columns.iter().skip(1).position(|c| c == name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.data.get(position).copied().flatten())
                .collect(),
        )
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the report returned no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

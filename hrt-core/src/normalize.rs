/// Record normalization: raw relay payload -> aligned per-metric sequences.
use std::collections::BTreeMap;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::MetricDef;
use crate::error::NormalizeError;

/// Clean per-metric numeric sequences, position-aligned with `time_list`.
///
/// Invariants: every column in `index_values` has exactly `time_list.len()`
/// entries, and every column kept in the map holds at least one `Some` value
/// (all-missing metrics are dropped during normalization). `None` marks a
/// missing sample and is never coerced to zero.
///
/// Row order matches upstream record order. Duplicate or out-of-order time
/// labels are passed through unchanged rather than silently fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedDataset {
    pub time_list: Vec<String>,
    pub index_values: BTreeMap<String, Vec<Option<f64>>>,
}

impl NormalizedDataset {
    /// Number of rows (time labels) in the dataset.
    pub fn len(&self) -> usize {
        self.time_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_list.is_empty()
    }
}

/// Convert a raw relay payload into a `NormalizedDataset`.
///
/// The payload must be a JSON object whose `list` field is an array of
/// records. Records without a time label contribute no row at all; within a
/// row, per-metric values that are missing, null, empty, or unparseable
/// become `None`, as does a literal zero on a zero-filtered metric.
pub fn normalize(
    payload: &Value,
    metrics: &[MetricDef],
) -> Result<NormalizedDataset, NormalizeError> {
    let list = payload
        .get("list")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            NormalizeError::MalformedPayload(format!(
                "expected a record array at `list`, found {}",
                json_type_name(payload.get("list"))
            ))
        })?;

    let mut time_list: Vec<String> = Vec::with_capacity(list.len());
    let mut columns: BTreeMap<String, Vec<Option<f64>>> = metrics
        .iter()
        .map(|metric| (metric.key.clone(), Vec::with_capacity(list.len())))
        .collect();

    for record in list {
        let label = record.get("tm").and_then(Value::as_str).unwrap_or("");
        if label.is_empty() {
            debug!("skipping record without time label: {record}");
            continue;
        }
        for metric in metrics {
            let value = extract_value(record.get(metric.key.as_str()), metric);
            if let Some(column) = columns.get_mut(&metric.key) {
                column.push(value);
            }
        }
        time_list.push(label.to_string());
    }

    if time_list.is_empty() {
        return Err(NormalizeError::NoValidRecords);
    }

    // Metrics with no valid samples at all never reach the legend.
    columns.retain(|key, column| {
        let keep = column.iter().any(Option::is_some);
        if !keep {
            info!("metric {key} has no valid samples in this window, dropping");
        }
        keep
    });

    if columns.is_empty() {
        return Err(NormalizeError::NoValidMetrics);
    }

    Ok(NormalizedDataset {
        time_list,
        index_values: columns,
    })
}

/// Extract one metric value from a record field.
///
/// Missing, null, empty-string, and unparseable values are all `None`. A
/// parsed value of exactly 0 is also `None` when the metric is zero-filtered;
/// for every other metric, 0 is a real reading.
fn extract_value(field: Option<&Value>, metric: &MetricDef) -> Option<f64> {
    let parsed = match field {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Number(n)) => n.as_f64(),
        Some(_) => None,
    }?;
    if metric.zero_filtered && parsed == 0.0 {
        debug!("zero-filtering {} reading of 0", metric.key);
        return None;
    }
    Some(parsed)
}

fn json_type_name(value: Option<&Value>) -> &'static str {
    match value {
        None => "nothing",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "a boolean",
        Some(Value::Number(_)) => "a number",
        Some(Value::String(_)) => "a string",
        Some(Value::Array(_)) => "an array",
        Some(Value::Object(_)) => "an object",
    }
}

/// Series building: normalized dataset + configuration -> renderable lines.
use serde::Serialize;

use crate::config::{Axis, StationConfig};
use crate::normalize::NormalizedDataset;
use crate::time_label::short_label;

/// How the charting layer should draw a series' line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Solid,
    Dashed,
}

/// One renderable line.
///
/// `points` is position-aligned with the dataset's time labels; `None` marks
/// a gap the chart must render as missing, never bridge down to zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub axis: Axis,
    pub points: Vec<Option<f64>>,
    pub color: String,
    pub line_style: LineStyle,
    pub show_symbol: bool,
}

/// Legend name of the flood-limit reference line.
pub const FLOOD_LIMIT_SERIES_NAME: &str = "Flood limit";

/// Build the ordered series set for a dataset.
///
/// Emits one solid series per visible metric that survived normalization, in
/// metric-table order, followed by exactly one dashed constant series at the
/// flood-limit level on the water-level (left) axis. Hidden metrics are
/// excluded even when they carry valid data.
pub fn build_series(dataset: &NormalizedDataset, config: &StationConfig) -> Vec<Series> {
    let mut series = Vec::with_capacity(config.metrics.len() + 1);
    for metric in &config.metrics {
        if !metric.show {
            continue;
        }
        let Some(points) = dataset.index_values.get(&metric.key) else {
            continue;
        };
        series.push(Series {
            name: metric.label.clone(),
            axis: metric.axis,
            points: points.clone(),
            color: metric.color.clone(),
            line_style: LineStyle::Solid,
            show_symbol: true,
        });
    }
    series.push(flood_limit_series(dataset.len(), config));
    series
}

/// Constant reference line at the flood limit, one point per time label so
/// the chart draws it across the whole window.
fn flood_limit_series(len: usize, config: &StationConfig) -> Series {
    Series {
        name: FLOOD_LIMIT_SERIES_NAME.to_string(),
        axis: Axis::Left,
        points: vec![Some(config.flood_limit_level); len],
        color: config.flood_limit_color.clone(),
        line_style: LineStyle::Dashed,
        show_symbol: false,
    }
}

/// Axis tick labels in short form, aligned with every series' points.
pub fn x_labels(dataset: &NormalizedDataset) -> Vec<String> {
    dataset.time_list.iter().map(|t| short_label(t)).collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::{default_metrics, MetricDef};
    use std::collections::BTreeMap;

    fn config() -> StationConfig {
        StationConfig::tongwan_defaults("http://relay.invalid/one.json")
    }

    fn dataset(columns: &[(&str, Vec<Option<f64>>)]) -> NormalizedDataset {
        let mut index_values = BTreeMap::new();
        for (key, points) in columns {
            index_values.insert(key.to_string(), points.clone());
        }
        NormalizedDataset {
            time_list: vec![
                "2024-06-01 00:00:00".to_string(),
                "2024-06-01 01:00:00".to_string(),
            ],
            index_values,
        }
    }

    #[test]
    fn test_reference_scenario_emits_four_series() {
        let dataset = dataset(&[
            ("rz", vec![Some(150.2), Some(150.3)]),
            ("inq", vec![Some(12.5), None]),
            ("otq", vec![None, Some(5.1)]),
        ]);
        let mut config = config();
        // Storage did not survive normalization in this scenario.
        config.metrics.retain(|m| m.key != "w");

        let series = build_series(&dataset, &config);
        assert_eq!(series.len(), 4);

        let flood = series.last().unwrap();
        assert_eq!(flood.name, FLOOD_LIMIT_SERIES_NAME);
        assert_eq!(flood.axis, Axis::Left);
        assert_eq!(flood.points, vec![Some(152.5), Some(152.5)]);
        assert_eq!(flood.line_style, LineStyle::Dashed);
        assert!(!flood.show_symbol);
    }

    #[test]
    fn test_hidden_metric_is_excluded() {
        let dataset = dataset(&[("rz", vec![Some(150.2), Some(150.3)])]);
        let mut config = config();
        for metric in &mut config.metrics {
            if metric.key == "rz" {
                metric.show = false;
            }
        }
        let series = build_series(&dataset, &config);
        // Only the flood-limit line remains.
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].name, FLOOD_LIMIT_SERIES_NAME);
    }

    #[test]
    fn test_dropped_metric_emits_no_series() {
        // "w" is visible in the config but absent from the dataset.
        let dataset = dataset(&[("rz", vec![Some(150.2), Some(150.3)])]);
        let series = build_series(&dataset, &config());
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "Water level");
    }

    #[test]
    fn test_series_order_follows_metric_table() {
        let dataset = dataset(&[
            ("inq", vec![Some(12.5), None]),
            ("otq", vec![None, Some(5.1)]),
            ("rz", vec![Some(150.2), Some(150.3)]),
            ("w", vec![Some(1.2), Some(1.3)]),
        ]);
        let series = build_series(&dataset, &config());
        let names: Vec<&str> = series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Water level", "Storage", "Inflow", "Outflow", FLOOD_LIMIT_SERIES_NAME]
        );
    }

    #[test]
    fn test_missing_points_stay_missing() {
        let dataset = dataset(&[("inq", vec![Some(12.5), None])]);
        let mut config = config();
        config.metrics = default_metrics()
            .into_iter()
            .filter(|m: &MetricDef| m.key == "inq")
            .collect();
        let series = build_series(&dataset, &config);
        assert_eq!(series[0].points, vec![Some(12.5), None]);
    }

    #[test]
    fn test_x_labels_shortened() {
        let dataset = dataset(&[("rz", vec![Some(150.2), Some(150.3)])]);
        assert_eq!(x_labels(&dataset), vec!["06-01 00:00", "06-01 01:00"]);
    }
}

/// Static configuration for a monitored station.
///
/// Everything a load needs to know is passed in explicitly through these
/// types; there is no process-wide mutable state.
use serde::{Deserialize, Serialize};

/// Which vertical axis a metric is plotted against. Water level lives on the
/// left axis; storage and flow metrics share the right one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Left,
    Right,
}

/// Definition of one tracked metric, keyed by the upstream short code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricDef {
    /// Upstream field code, e.g. "rz" for reservoir water level.
    pub key: String,
    pub label: String,
    pub unit: String,
    pub color: String,
    pub axis: Axis,
    /// Hidden metrics are normalized but never emitted as series.
    pub show: bool,
    /// Treat a literal 0 reading as missing. Flow sensors report 0 when they
    /// have no data, so 0 is noise for those metrics, not a measurement.
    pub zero_filtered: bool,
}

/// Per-station configuration consumed by fetch, normalize, and series build.
#[derive(Debug, Clone)]
pub struct StationConfig {
    /// Relay endpoint that forwards the GET to the hydrology API.
    pub proxy_url: String,
    pub station_code: String,
    pub station_name: String,
    pub metrics: Vec<MetricDef>,
    /// Flood-limit water level in meters, drawn as a constant reference line.
    pub flood_limit_level: f64,
    pub flood_limit_color: String,
}

/// The reference metric table: water level, storage volume, inflow, outflow.
pub fn default_metrics() -> Vec<MetricDef> {
    vec![
        MetricDef {
            key: "rz".to_string(),
            label: "Water level".to_string(),
            unit: "m".to_string(),
            color: "#2196F3".to_string(),
            axis: Axis::Left,
            show: true,
            zero_filtered: false,
        },
        MetricDef {
            key: "w".to_string(),
            label: "Storage".to_string(),
            unit: "10^6 m^3".to_string(),
            color: "#9C27B0".to_string(),
            axis: Axis::Right,
            show: true,
            zero_filtered: false,
        },
        MetricDef {
            key: "inq".to_string(),
            label: "Inflow".to_string(),
            unit: "m^3/s".to_string(),
            color: "#4CAF50".to_string(),
            axis: Axis::Right,
            show: true,
            zero_filtered: true,
        },
        MetricDef {
            key: "otq".to_string(),
            label: "Outflow".to_string(),
            unit: "m^3/s".to_string(),
            color: "#FF9800".to_string(),
            axis: Axis::Right,
            show: true,
            zero_filtered: true,
        },
    ]
}

impl StationConfig {
    /// Reference deployment: the Tongwan reservoir in Zhongfang county.
    pub fn tongwan_defaults(proxy_url: impl Into<String>) -> Self {
        StationConfig {
            proxy_url: proxy_url.into(),
            station_code: "613K0912".to_string(),
            station_name: "Tongwan Reservoir".to_string(),
            metrics: default_metrics(),
            flood_limit_level: 152.5,
            flood_limit_color: "#F44336".to_string(),
        }
    }
}

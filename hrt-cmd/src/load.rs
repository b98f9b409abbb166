//! The load pipeline: window -> fetch -> normalize -> cache -> series.
//!
//! One load is a single sequential chain; the fetch is its only suspension
//! point. Any failure before a clean dataset falls back to the snapshot
//! cache, and only when the cache also has nothing fresh does the failure
//! surface to the caller.

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;
use serde_json::Value;

use hrt_core::cache::{self, SnapshotStore};
use hrt_core::config::StationConfig;
use hrt_core::error::{FetchError, LoadError};
use hrt_core::fetch;
use hrt_core::normalize::{normalize, NormalizedDataset};
use hrt_core::series::{build_series, Series};
use hrt_core::window::StationWindow;

/// Where the dataset of a successful load came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Remote,
    Cache,
}

/// Everything a caller needs to render one load.
#[derive(Debug, Clone, Serialize)]
pub struct LoadOutcome {
    pub source: DataSource,
    pub window: StationWindow,
    pub dataset: NormalizedDataset,
    pub series: Vec<Series>,
}

/// Run one full load for the station. Exactly one fetch attempt; concurrent
/// loads are independent and deduplication is the caller's concern.
pub async fn load_station(
    client: &reqwest::Client,
    config: &StationConfig,
    store: &mut dyn SnapshotStore,
    now: DateTime<Utc>,
) -> Result<LoadOutcome, LoadError> {
    let window = StationWindow::lookback_from(now);
    let fetched = fetch::fetch_window(client, config, &window).await;
    resolve(fetched, window, config, store, now)
}

/// Turn a fetch result into a render-ready outcome, falling back to the
/// snapshot cache when the remote leg fails anywhere before a clean dataset.
///
/// Synchronous so the whole fallback matrix is testable without I/O. A
/// snapshot write failure never blocks returning the fresh dataset.
pub fn resolve(
    fetched: Result<Value, FetchError>,
    window: StationWindow,
    config: &StationConfig,
    store: &mut dyn SnapshotStore,
    now: DateTime<Utc>,
) -> Result<LoadOutcome, LoadError> {
    let remote_failure = match fetched {
        Ok(payload) => match normalize(&payload, &config.metrics) {
            Ok(dataset) => {
                cache::write_snapshot(store, &config.station_code, &dataset, &window, now);
                let series = build_series(&dataset, config);
                info!(
                    "loaded {} rows, {} series from remote",
                    dataset.len(),
                    series.len()
                );
                return Ok(LoadOutcome {
                    source: DataSource::Remote,
                    window,
                    dataset,
                    series,
                });
            }
            Err(e) => e.into(),
        },
        Err(e) => e.into(),
    };

    warn!("remote load failed ({remote_failure}), trying cached snapshot");
    match cache::read_snapshot(&*store, &config.station_code, now) {
        Ok(entry) => {
            info!("serving snapshot captured at {}", entry.captured_at);
            let series = build_series(&entry.dataset, config);
            Ok(LoadOutcome {
                source: DataSource::Cache,
                window: entry.window,
                dataset: entry.dataset,
                series,
            })
        }
        Err(cache_err) => Err(LoadError {
            remote: remote_failure,
            cache: cache_err,
        }),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{Duration, TimeZone};
    use hrt_core::cache::MemoryStore;
    use hrt_core::config::Axis;
    use hrt_core::error::{CacheError, RemoteError};
    use serde_json::json;

    fn config() -> StationConfig {
        StationConfig::tongwan_defaults("http://relay.invalid/one.json")
    }

    fn window() -> StationWindow {
        StationWindow {
            date_begin: "2024-06-01+00".to_string(),
            date_end: "2024-06-03+00".to_string(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap()
    }

    fn reference_payload() -> Value {
        json!({"list": [
            {"tm": "2024-06-01 00:00", "rz": "150.2", "inq": "12.5", "otq": "0"},
            {"tm": "2024-06-01 01:00", "rz": "150.3", "inq": "0", "otq": "5.1"},
        ]})
    }

    #[test]
    fn test_remote_success_builds_series_and_caches() {
        let mut store = MemoryStore::new();
        let outcome =
            resolve(Ok(reference_payload()), window(), &config(), &mut store, now()).unwrap();

        assert_eq!(outcome.source, DataSource::Remote);
        assert_eq!(
            outcome.dataset.time_list,
            vec!["2024-06-01 00:00", "2024-06-01 01:00"]
        );
        // rz, inq, otq survive ("w" was absent upstream), plus the flood line.
        assert_eq!(outcome.series.len(), 4);
        let flood = outcome.series.last().unwrap();
        assert_eq!(flood.points, vec![Some(152.5), Some(152.5)]);
        assert_eq!(flood.axis, Axis::Left);

        // The snapshot is now readable as a fallback.
        assert!(cache::read_snapshot(&store, "613K0912", now()).is_ok());
    }

    #[test]
    fn test_fetch_failure_falls_back_to_fresh_snapshot() {
        let mut store = MemoryStore::new();
        // Seed the cache with a successful load 2 hours ago.
        let earlier = now() - Duration::hours(2);
        resolve(Ok(reference_payload()), window(), &config(), &mut store, earlier).unwrap();

        let failure = FetchError::Network {
            reason: "connection refused".to_string(),
            timed_out: false,
        };
        let outcome = resolve(Err(failure), window(), &config(), &mut store, now()).unwrap();
        assert_eq!(outcome.source, DataSource::Cache);
        assert_eq!(outcome.dataset.time_list.len(), 2);
        assert_eq!(outcome.series.len(), 4);
    }

    #[test]
    fn test_malformed_payload_falls_back_too() {
        let mut store = MemoryStore::new();
        let earlier = now() - Duration::hours(1);
        resolve(Ok(reference_payload()), window(), &config(), &mut store, earlier).unwrap();

        let outcome = resolve(
            Ok(json!({"apiError": "boom"})),
            window(),
            &config(),
            &mut store,
            now(),
        )
        .unwrap();
        assert_eq!(outcome.source, DataSource::Cache);
    }

    #[test]
    fn test_stale_snapshot_is_not_served() {
        let mut store = MemoryStore::new();
        let long_ago = now() - Duration::hours(6);
        resolve(Ok(reference_payload()), window(), &config(), &mut store, long_ago).unwrap();

        let failure = FetchError::Upstream {
            status: 502,
            body: "bad gateway".to_string(),
        };
        let err = resolve(Err(failure), window(), &config(), &mut store, now()).unwrap_err();
        assert!(matches!(err.remote, RemoteError::Fetch(_)));
        assert!(matches!(err.cache, CacheError::Stale { .. }));
    }

    #[test]
    fn test_no_snapshot_surfaces_terminal_error() {
        let mut store = MemoryStore::new();
        let failure = FetchError::BodyNotJson {
            body: "<html>".to_string(),
        };
        let err = resolve(Err(failure), window(), &config(), &mut store, now()).unwrap_err();
        assert_eq!(err.cache, CacheError::Unavailable);
    }

    #[test]
    fn test_cache_fallback_keeps_cached_window() {
        let mut store = MemoryStore::new();
        let earlier = now() - Duration::hours(2);
        resolve(Ok(reference_payload()), window(), &config(), &mut store, earlier).unwrap();

        let newer_window = StationWindow {
            date_begin: "2024-06-01+02".to_string(),
            date_end: "2024-06-03+02".to_string(),
        };
        let failure = FetchError::Network {
            reason: "dns".to_string(),
            timed_out: true,
        };
        let outcome = resolve(Err(failure), newer_window, &config(), &mut store, now()).unwrap();
        // The outcome reports the window the snapshot was captured for.
        assert_eq!(outcome.window, window());
    }
}

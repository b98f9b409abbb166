/// Single-slot snapshot cache for the most recent normalized dataset.
///
/// One entry per station, overwritten on every successful load, served back
/// only while still fresh. Last-writer-wins with no locking: writes are not
/// concurrent within one load chain, and a cross-load race only affects which
/// snapshot is cached, never the freshly displayed dataset.
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::CacheError;
use crate::normalize::NormalizedDataset;
use crate::window::StationWindow;

/// Maximum age a snapshot may reach and still be served as a fallback.
/// An entry exactly this old is already unusable.
pub const FRESHNESS_LIMIT_HOURS: i64 = 6;

/// The key/value contract the snapshot cache needs from device storage.
/// No transactions and no multi-key guarantees.
pub trait SnapshotStore {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), CacheError>;
}

/// A cached window for one station.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub dataset: NormalizedDataset,
    pub window: StationWindow,
    pub captured_at: DateTime<Utc>,
}

/// Storage key for a station's snapshot slot.
pub fn snapshot_key(station_code: &str) -> String {
    format!("hydro_snapshot_{station_code}")
}

/// Overwrite the station's snapshot slot, tagging it with `now`.
///
/// Failures are logged and swallowed: a cache miss on some later load is
/// strictly better than failing a load that already has fresh data in hand.
pub fn write_snapshot(
    store: &mut dyn SnapshotStore,
    station_code: &str,
    dataset: &NormalizedDataset,
    window: &StationWindow,
    now: DateTime<Utc>,
) {
    let entry = CacheEntry {
        dataset: dataset.clone(),
        window: window.clone(),
        captured_at: now,
    };
    let blob = match serde_json::to_string(&entry) {
        Ok(blob) => blob,
        Err(e) => {
            warn!("snapshot serialize failed for {station_code}: {e}");
            return;
        }
    };
    if let Err(e) = store.set(&snapshot_key(station_code), &blob) {
        warn!("snapshot write failed for {station_code}: {e}");
    }
}

/// Read the station's snapshot if one exists and is still fresh at `now`.
pub fn read_snapshot(
    store: &dyn SnapshotStore,
    station_code: &str,
    now: DateTime<Utc>,
) -> Result<CacheEntry, CacheError> {
    let blob = store
        .get(&snapshot_key(station_code))?
        .ok_or(CacheError::Unavailable)?;
    let entry: CacheEntry = serde_json::from_str(&blob)
        .map_err(|e| CacheError::Store(format!("snapshot blob corrupt: {e}")))?;
    let age = now - entry.captured_at;
    if age >= Duration::hours(FRESHNESS_LIMIT_HOURS) {
        return Err(CacheError::Stale {
            age_minutes: age.num_minutes(),
        });
    }
    Ok(entry)
}

/// Key/value store that keeps each key as a JSON blob file under a directory.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SnapshotStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::Store(e.to_string())),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CacheError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| CacheError::Store(e.to_string()))?;
        std::fs::write(self.path_for(key), value).map_err(|e| CacheError::Store(e.to_string()))
    }
}

/// In-memory store, used in tests and anywhere persistence is not wanted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CacheError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Error types for the telemetry pipeline.
use thiserror::Error;

/// Failure of the single upstream GET, before any shape checks on the body.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection, DNS, or timeout failure. `timed_out` is kept separate so
    /// logs can tell a slow relay from an unreachable one; downstream both
    /// are handled the same way.
    #[error("network failure (timed out: {timed_out}): {reason}")]
    Network { reason: String, timed_out: bool },

    /// Non-2xx response from the relay. The raw body is retained for
    /// diagnostics and must never be surfaced to end users verbatim.
    #[error("upstream returned HTTP {status}")]
    Upstream { status: u16, body: String },

    /// 2xx response whose body is not valid JSON.
    #[error("upstream body is not valid JSON")]
    BodyNotJson { body: String },
}

/// Failure to turn a raw payload into aligned per-metric sequences.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// The payload parsed as JSON but its `list` field is not an array.
    #[error("payload shape unexpected: {0}")]
    MalformedPayload(String),

    /// Every record was dropped for lacking a usable time label.
    #[error("no records with a usable time label")]
    NoValidRecords,

    /// Every tracked metric column ended up all-missing.
    #[error("no tracked metric has any valid samples")]
    NoValidMetrics,
}

/// Failure to serve a cached snapshot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// No snapshot has ever been written for this station.
    #[error("no cached snapshot available")]
    Unavailable,

    /// A snapshot exists but is past the freshness limit.
    #[error("cached snapshot is too old ({age_minutes} minutes)")]
    Stale { age_minutes: i64 },

    /// The underlying key/value store failed, or the stored blob is corrupt.
    #[error("snapshot store error: {0}")]
    Store(String),
}

/// A failure in the remote leg of a load, before any cache fallback.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

/// Terminal load failure: the remote leg failed and no fresh snapshot could
/// cover for it. Both causes are kept for diagnostics.
#[derive(Error, Debug)]
#[error("load failed: {remote}; no usable snapshot: {cache}")]
pub struct LoadError {
    pub remote: RemoteError,
    pub cache: CacheError,
}

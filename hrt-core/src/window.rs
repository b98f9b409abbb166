/// Request window calculation for the hydrology API.
use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Format the API expects for window boundaries: date plus hour, minutes and
/// seconds truncated. The `+` is part of the format, not URL encoding; the
/// relay turns it back into the space the upstream service wants.
pub const WINDOW_FORMAT: &str = "%Y-%m-%d+%H";

/// UTC offset of the station's wall clock (China Standard Time).
pub const STATION_UTC_OFFSET_HOURS: i32 = 8;

/// Hours of history requested per load.
pub const LOOKBACK_HOURS: i64 = 48;

/// The bounded time window sent upstream with each request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationWindow {
    pub date_begin: String,
    pub date_end: String,
}

impl StationWindow {
    /// The 48-hour window ending at `now`, both boundaries in station
    /// wall-clock time. Deterministic given the instant; chrono arithmetic
    /// handles month and year rollover.
    pub fn lookback_from(now: DateTime<Utc>) -> Self {
        let offset = FixedOffset::east_opt(STATION_UTC_OFFSET_HOURS * 3600)
            .expect("static offset is in range");
        let end = now.with_timezone(&offset);
        let begin = end - Duration::hours(LOOKBACK_HOURS);
        StationWindow {
            date_begin: begin.format(WINDOW_FORMAT).to_string(),
            date_end: end.format(WINDOW_FORMAT).to_string(),
        }
    }
}

/// Parsing for upstream time labels.
///
/// This is the one place the `tm` field's text form is interpreted; everywhere
/// else the label is carried as an opaque string. A label that parses in
/// neither known format is still a valid row key — only a missing or empty
/// label drops a record.
use chrono::NaiveDateTime;

/// Timestamp format upstream records use in their `tm` field.
pub const TIME_LABEL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Some upstream rows omit the seconds.
pub const TIME_LABEL_FORMAT_SHORT: &str = "%Y-%m-%d %H:%M";

/// Parse an upstream time label into a typed instant, if it is in one of the
/// known formats.
pub fn parse_time_label(label: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(label, TIME_LABEL_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(label, TIME_LABEL_FORMAT_SHORT))
        .ok()
}

/// Axis-tick form of a label: "MM-DD HH:MM". Unparseable labels pass through
/// unchanged so the chart still has something to show.
pub fn short_label(label: &str) -> String {
    match parse_time_label(label) {
        Some(instant) => instant.format("%m-%d %H:%M").to_string(),
        None => label.to_string(),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_full_format() {
        let instant = parse_time_label("2024-06-01 08:00:00").unwrap();
        assert_eq!(instant.month(), 6);
        assert_eq!(instant.hour(), 8);
    }

    #[test]
    fn test_parse_without_seconds() {
        assert!(parse_time_label("2024-06-01 08:00").is_some());
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert!(parse_time_label("not a time").is_none());
        assert!(parse_time_label("").is_none());
    }

    #[test]
    fn test_short_label() {
        assert_eq!(short_label("2024-06-01 08:00:00"), "06-01 08:00");
        assert_eq!(short_label("opaque"), "opaque");
    }
}

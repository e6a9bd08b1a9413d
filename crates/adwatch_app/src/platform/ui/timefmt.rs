//! Relative timestamp formatting for ad cards.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// Formats a backend timestamp relative to `now`: "just now", minutes, hours
/// or days ago, falling back to the absolute date past a week. Unparseable
/// input is shown verbatim.
pub fn format_relative(timestamp: &str, now: DateTime<Utc>) -> String {
    let Some(parsed) = parse(timestamp) else {
        return timestamp.to_string();
    };

    let seconds = (now - parsed).num_seconds().max(0);
    if seconds < 60 {
        "just now".to_string()
    } else if seconds < 3_600 {
        format!("{}m ago", seconds / 60)
    } else if seconds < 86_400 {
        format!("{}h ago", seconds / 3_600)
    } else if seconds < 604_800 {
        format!("{}d ago", seconds / 86_400)
    } else {
        parsed.format("%Y-%m-%d %H:%M").to_string()
    }
}

fn parse(timestamp: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) {
        return Some(parsed.with_timezone(&Utc));
    }
    // The backend also emits naive "YYYY-MM-DD HH:MM:SS" stamps.
    if let Ok(naive) = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(iso: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(iso)
            .expect("test timestamp")
            .with_timezone(&Utc)
    }

    #[test]
    fn recent_stamps_are_relative() {
        let now = at("2026-08-06T12:00:00Z");
        assert_eq!(format_relative("2026-08-06T11:59:30Z", now), "just now");
        assert_eq!(format_relative("2026-08-06T11:55:00Z", now), "5m ago");
        assert_eq!(format_relative("2026-08-06T09:00:00Z", now), "3h ago");
        assert_eq!(format_relative("2026-08-04T12:00:00Z", now), "2d ago");
    }

    #[test]
    fn old_stamps_are_absolute() {
        let now = at("2026-08-06T12:00:00Z");
        assert_eq!(
            format_relative("2026-01-01T08:30:00Z", now),
            "2026-01-01 08:30"
        );
    }

    #[test]
    fn naive_backend_stamps_parse() {
        let now = at("2026-08-06T12:00:00Z");
        assert_eq!(format_relative("2026-08-06 11:55:00", now), "5m ago");
    }

    #[test]
    fn future_or_garbled_stamps_do_not_panic() {
        let now = at("2026-08-06T12:00:00Z");
        assert_eq!(format_relative("2026-08-06T13:00:00Z", now), "just now");
        assert_eq!(format_relative("yesterday-ish", now), "yesterday-ish");
        assert_eq!(format_relative("", now), "");
    }
}

//! Formatting and display logic
//!
//! Pure functions for formatting data for human-readable display.

use chrono::{DateTime, Local, Utc};

/// Format a timestamp in local time, e.g. "2024-11-03 14:05"
pub fn format_timestamp(time: &DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Format how long ago something happened
///
/// Shows the most significant unit only. Future times count as "now".
///
/// # Examples
/// ```
/// use kelitui::logic::formatting::format_age;
///
/// assert_eq!(format_age(0), "now");
/// assert_eq!(format_age(59), "now");
/// assert_eq!(format_age(60), "1m");
/// assert_eq!(format_age(3600), "1h");
/// assert_eq!(format_age(90000), "1d");
/// ```
pub fn format_age(seconds: i64) -> String {
    if seconds < 60 {
        "now".to_string()
    } else if seconds < 3600 {
        format!("{}m", seconds / 60)
    } else if seconds < 86400 {
        format!("{}h", seconds / 3600)
    } else {
        format!("{}d", seconds / 86400)
    }
}

/// Age of `time` relative to `now`
pub fn format_age_since(time: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    format_age((*now - *time).num_seconds())
}

/// Heat indicator for an interesting station, one flame per level
///
/// # Examples
/// ```
/// use kelitui::logic::formatting::heat_indicator;
///
/// assert_eq!(heat_indicator(0), "");
/// assert_eq!(heat_indicator(1), "▴");
/// assert_eq!(heat_indicator(3), "▴▴");
/// assert_eq!(heat_indicator(12), "▴▴▴");
/// ```
pub fn heat_indicator(count: u32) -> String {
    let level = match count {
        0 => 0,
        1..=2 => 1,
        3..=9 => 2,
        _ => 3,
    };
    "▴".repeat(level)
}

/// Truncate to `max` characters, adding an ellipsis when shortened
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_age_minutes() {
        assert_eq!(format_age(120), "2m");
        assert_eq!(format_age(3599), "59m");
    }

    #[test]
    fn test_format_age_negative_is_now() {
        assert_eq!(format_age(-30), "now");
    }

    #[test]
    fn test_format_age_since() {
        let then = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 0).unwrap();
        assert_eq!(format_age_since(&then, &now), "2h");
    }

    #[test]
    fn test_heat_levels() {
        assert_eq!(heat_indicator(2), "▴");
        assert_eq!(heat_indicator(9), "▴▴");
        assert_eq!(heat_indicator(10), "▴▴▴");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Oulu", 10), "Oulu");
        assert_eq!(truncate("Kempele", 4), "Kem…");
    }
}

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};

use crate::models::{DayType, Daypart};

// ── Timestamp parsing ─────────────────────────────────────────────────────────

/// Layouts accepted for the `DateTime` column, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Parse a local wall-clock timestamp from the dataset.
///
/// Timestamps carry no zone: the bakery recorded local time, and dayparts are
/// defined on that local clock. Returns `None` for empty strings or layouts
/// not listed in [`DATETIME_FORMATS`].
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
}

// ── Derivation ────────────────────────────────────────────────────────────────

/// Bucket an hour of day (0–23) into a daypart.
///
/// | Hours       | Daypart   |
/// |-------------|-----------|
/// | 06 – 11     | Morning   |
/// | 12 – 16     | Afternoon |
/// | 17 – 20     | Evening   |
/// | 21 – 05     | Night     |
pub fn daypart_for_hour(hour: u32) -> Daypart {
    match hour {
        6..=11 => Daypart::Morning,
        12..=16 => Daypart::Afternoon,
        17..=20 => Daypart::Evening,
        _ => Daypart::Night,
    }
}

pub fn daypart_for(ts: &NaiveDateTime) -> Daypart {
    daypart_for_hour(ts.hour())
}

/// Saturday and Sunday are weekend days.
pub fn day_type_for(ts: &NaiveDateTime) -> DayType {
    match ts.weekday() {
        Weekday::Sat | Weekday::Sun => DayType::Weekend,
        _ => DayType::Weekday,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_datetime_dataset_layout() {
        let parsed = parse_datetime("2016-10-30 09:58:11").unwrap();
        assert_eq!(parsed, ts(2016, 10, 30, 9, 58) + chrono::Duration::seconds(11));
    }

    #[test]
    fn test_parse_datetime_iso_t() {
        assert!(parse_datetime("2016-10-30T09:58:11").is_some());
        assert!(parse_datetime("2016-10-30T09:58:11.250").is_some());
    }

    #[test]
    fn test_parse_datetime_without_seconds() {
        assert_eq!(parse_datetime("2016-10-30 09:58"), Some(ts(2016, 10, 30, 9, 58)));
    }

    #[test]
    fn test_parse_datetime_day_first() {
        assert_eq!(parse_datetime("30/10/2016 09:58"), Some(ts(2016, 10, 30, 9, 58)));
    }

    #[test]
    fn test_parse_datetime_trims() {
        assert!(parse_datetime("  2016-10-30 09:58:11 ").is_some());
    }

    #[test]
    fn test_parse_datetime_rejects_garbage() {
        assert!(parse_datetime("").is_none());
        assert!(parse_datetime("   ").is_none());
        assert!(parse_datetime("not-a-date").is_none());
        assert!(parse_datetime("2016-13-45 25:61:00").is_none());
    }

    #[test]
    fn test_daypart_boundaries() {
        assert_eq!(daypart_for_hour(5), Daypart::Night);
        assert_eq!(daypart_for_hour(6), Daypart::Morning);
        assert_eq!(daypart_for_hour(11), Daypart::Morning);
        assert_eq!(daypart_for_hour(12), Daypart::Afternoon);
        assert_eq!(daypart_for_hour(16), Daypart::Afternoon);
        assert_eq!(daypart_for_hour(17), Daypart::Evening);
        assert_eq!(daypart_for_hour(20), Daypart::Evening);
        assert_eq!(daypart_for_hour(21), Daypart::Night);
        assert_eq!(daypart_for_hour(0), Daypart::Night);
    }

    #[test]
    fn test_daypart_for_timestamp() {
        assert_eq!(daypart_for(&ts(2016, 10, 30, 14, 5)), Daypart::Afternoon);
    }

    #[test]
    fn test_day_type_for() {
        // 2016-10-30 was a Sunday, 2016-10-31 a Monday.
        assert_eq!(day_type_for(&ts(2016, 10, 30, 10, 0)), DayType::Weekend);
        assert_eq!(day_type_for(&ts(2016, 10, 31, 10, 0)), DayType::Weekday);
        assert_eq!(day_type_for(&ts(2016, 10, 29, 10, 0)), DayType::Weekend);
    }
}

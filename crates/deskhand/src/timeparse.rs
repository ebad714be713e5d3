use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %I:%M %p",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M %p",
    "%B %d, %Y %H:%M",
    "%B %d, %Y %I:%M %p",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%B %d, %Y"];

/// Parses a human-entered datetime in one of the accepted formats.
/// Date-only inputs land on midnight.
pub(crate) fn parse_datetime(input: &str) -> Option<NaiveDateTime> {
    let trimmed = input.trim();
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(parsed.and_time(NaiveTime::MIN));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 12, 31)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap();

        assert_eq!(parse_datetime("2024-12-31 14:00"), Some(expected));
        assert_eq!(parse_datetime("2024-12-31 02:00 PM"), Some(expected));
        assert_eq!(parse_datetime("12/31/2024 14:00"), Some(expected));
        assert_eq!(parse_datetime("December 31, 2024 02:00 PM"), Some(expected));
    }

    #[test]
    fn test_date_only_is_midnight() {
        let midnight = NaiveDate::from_ymd_opt(2024, 12, 31)
            .unwrap()
            .and_time(NaiveTime::MIN);
        assert_eq!(parse_datetime("2024-12-31"), Some(midnight));
        assert_eq!(parse_datetime(" December 31, 2024 "), Some(midnight));
    }

    #[test]
    fn test_rejects_noise() {
        assert_eq!(parse_datetime("tomorrow-ish"), None);
        assert_eq!(parse_datetime(""), None);
        assert_eq!(parse_datetime("31-12-2024"), None);
    }
}

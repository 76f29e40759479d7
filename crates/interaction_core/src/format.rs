//! Date and time display helpers for timetable views.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};

pub const DEFAULT_DATE_PATTERN: &str = "YYYY-MM-DD";
pub const DEFAULT_TIME_PATTERN: &str = "HH:mm";

/// Substitutes `YYYY`, `MM` and `DD` in `pattern`.
pub fn format_date(date: NaiveDate, pattern: &str) -> String {
    pattern
        .replace("YYYY", &format!("{:04}", date.year()))
        .replace("MM", &format!("{:02}", date.month()))
        .replace("DD", &format!("{:02}", date.day()))
}

/// Substitutes `HH` (24-hour) and `mm` in `pattern`.
pub fn format_time(time: NaiveTime, pattern: &str) -> String {
    pattern
        .replace("HH", &format!("{:02}", time.hour()))
        .replace("mm", &format!("{:02}", time.minute()))
}

/// Parses `HH:MM` or `HH:MM:SS`.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_dates_with_padding() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).expect("date");
        assert_eq!(format_date(date, DEFAULT_DATE_PATTERN), "2024-03-07");
        assert_eq!(format_date(date, "DD/MM/YYYY"), "07/03/2024");
    }

    #[test]
    fn formats_times() {
        let time = parse_time("09:05").expect("time");
        assert_eq!(format_time(time, DEFAULT_TIME_PATTERN), "09:05");
        let time = parse_time("14:30:59").expect("time");
        assert_eq!(format_time(time, "HHh mm"), "14h 30");
        assert_eq!(parse_time("25:00"), None);
    }
}

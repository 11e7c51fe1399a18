//! Date/time combination helpers.
//!
//! # Responsibility
//! - Turn an activity's `date` + `time` strings into one absolute local
//!   instant.
//! - Stay total: malformed input yields `None`, never a panic or error.
//!
//! # Invariants
//! - The instant is recomputed on every call; nothing here caches.

use chrono::{DateTime, Local, NaiveDate, NaiveTime};

/// Combines a `YYYY-MM-DD` date and `HH:MM` time into a local instant.
///
/// Returns `None` when either part does not parse or the wall-clock
/// combination does not exist in the local timezone (DST gaps).
pub fn combine(date: &str, time: &str) -> Option<DateTime<Local>> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
    let time = NaiveTime::parse_from_str(time.trim(), "%H:%M").ok()?;
    date.and_time(time).and_local_timezone(Local).single()
}

#[cfg(test)]
mod tests {
    use super::combine;
    use chrono::Timelike;

    #[test]
    fn combines_valid_date_and_time() {
        let instant = combine("2026-03-10", "14:30").unwrap();
        assert_eq!(instant.hour(), 14);
        assert_eq!(instant.minute(), 30);
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        assert!(combine(" 2026-03-10 ", " 09:00 ").is_some());
    }

    #[test]
    fn malformed_input_yields_none() {
        assert!(combine("not-a-date", "14:30").is_none());
        assert!(combine("2026-03-10", "25:61").is_none());
        assert!(combine("2026-02-30", "10:00").is_none());
        assert!(combine("", "").is_none());
    }
}

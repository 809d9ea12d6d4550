//! Daily journal conventions: entries are keyed by ISO date.

use chrono::{Local, NaiveDate};

use crate::domain::NoteEntry;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Today's entry name in local time, e.g. `"2025-03-18"`.
pub fn today_key() -> String {
    date_key(Local::now().date_naive())
}

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses an entry name back into a date, if it is one.
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, DATE_FORMAT).ok()
}

/// Orders journal entries newest first. ISO dates sort lexically, so this
/// is a reverse key sort; non-date names end up after the dates.
pub fn newest_first(entries: &[NoteEntry]) -> Vec<NoteEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| {
        let (da, db) = (parse_date_key(&a.key), parse_date_key(&b.key));
        match (da, db) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.key.cmp(&b.key),
        }
    });
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_keys_round_trip_through_parse() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 18).unwrap();
        assert_eq!(date_key(date), "2025-03-18");
        assert_eq!(parse_date_key("2025-03-18"), Some(date));
        assert_eq!(parse_date_key("groceries"), None);
    }

    #[test]
    fn today_key_is_a_date() {
        assert!(parse_date_key(&today_key()).is_some());
    }

    #[test]
    fn newest_first_puts_dates_before_other_names() {
        let entries = vec![
            NoteEntry::new("2025-03-17"),
            NoteEntry::new("scratch"),
            NoteEntry::new("2025-03-18"),
            NoteEntry::new("2024-12-31"),
        ];

        let keys: Vec<_> = newest_first(&entries).into_iter().map(|e| e.key).collect();
        assert_eq!(keys, ["2025-03-18", "2025-03-17", "2024-12-31", "scratch"]);
    }
}

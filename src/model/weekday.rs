use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Number of days in a schedule week.
pub const DAYS_PER_WEEK: u8 = 7;

/// Weekday names indexed by schedule index (0 = Monday).
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const WEEKDAY_NAMES_RU: [&str; 7] = [
    "Понедельник",
    "Вторник",
    "Среда",
    "Четверг",
    "Пятница",
    "Суббота",
    "Воскресенье",
];

const WEEKDAY_ABBREVS: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

/// Display language for weekday names and completion counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ru,
}

impl Language {
    pub fn parse(s: &str) -> Option<Language> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Some(Language::En),
            "ru" | "russian" => Some(Language::Ru),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ru => "ru",
        }
    }

    pub fn weekday_names(self) -> &'static [&'static str; 7] {
        match self {
            Language::En => &WEEKDAY_NAMES,
            Language::Ru => &WEEKDAY_NAMES_RU,
        }
    }
}

/// Schedule index of a calendar date: 0 = Monday … 6 = Sunday.
///
/// Every place that needs "today's weekday" goes through this function so the
/// schedule convention is defined exactly once.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_monday() as u8
}

/// Name of the weekday for a schedule index, or `None` outside 0..=6.
pub fn weekday_name(index: u8) -> Option<&'static str> {
    WEEKDAY_NAMES.get(index as usize).copied()
}

/// Parse a weekday token (`mon`, `Monday`, `0`) into a schedule index.
pub fn parse_weekday(token: &str) -> Option<u8> {
    let t = token.trim().to_lowercase();
    if let Ok(n) = t.parse::<u8>() {
        return (n < DAYS_PER_WEEK).then_some(n);
    }
    WEEKDAY_ABBREVS
        .iter()
        .zip(WEEKDAY_NAMES.iter())
        .position(|(abbrev, full)| t == *abbrev || t == full.to_lowercase())
        .map(|i| i as u8)
}

/// Parse a comma-separated weekday list. `daily` expands to the whole week,
/// an empty string yields an empty schedule.
pub fn parse_schedule(input: &str) -> Result<Vec<u8>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Vec::new());
    }
    if input.eq_ignore_ascii_case("daily") {
        return Ok((0..DAYS_PER_WEEK).collect());
    }
    let mut days = Vec::new();
    for token in input.split(',') {
        let day = parse_weekday(token).ok_or_else(|| format!("unknown weekday: {}", token.trim()))?;
        if !days.contains(&day) {
            days.push(day);
        }
    }
    Ok(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_index_starts_on_monday() {
        // 2024-01-01 was a Monday
        let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(weekday_index(monday), 0);
        assert_eq!(weekday_index(monday.succ_opt().unwrap()), 1);
        let sunday = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        assert_eq!(weekday_index(sunday), 6);
    }

    #[test]
    fn weekday_name_out_of_range() {
        assert_eq!(weekday_name(0), Some("Monday"));
        assert_eq!(weekday_name(6), Some("Sunday"));
        assert_eq!(weekday_name(7), None);
    }

    #[test]
    fn parse_weekday_tokens() {
        assert_eq!(parse_weekday("mon"), Some(0));
        assert_eq!(parse_weekday("Sunday"), Some(6));
        assert_eq!(parse_weekday(" 3 "), Some(3));
        assert_eq!(parse_weekday("7"), None);
        assert_eq!(parse_weekday("someday"), None);
    }

    #[test]
    fn parse_schedule_keeps_order_and_dedups() {
        assert_eq!(parse_schedule("fri,mon,fri").unwrap(), vec![4, 0]);
        assert_eq!(parse_schedule("daily").unwrap(), vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(parse_schedule("").unwrap(), Vec::<u8>::new());
        assert!(parse_schedule("mon,xyz").is_err());
    }

    #[test]
    fn language_tables() {
        assert_eq!(Language::parse("RU"), Some(Language::Ru));
        assert_eq!(Language::Ru.weekday_names()[0], "Понедельник");
        assert_eq!(Language::En.weekday_names()[6], "Sunday");
        assert_eq!(Language::parse("fr"), None);
    }
}

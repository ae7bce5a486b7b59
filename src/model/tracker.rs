use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::weekday::{DAYS_PER_WEEK, Language, WEEKDAY_NAMES};

/// Stable, opaque tracker identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackerId(Uuid);

impl TrackerId {
    /// Allocate a fresh random id. Ids are never reused.
    pub fn new() -> Self {
        TrackerId(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// First eight hex digits, enough to address a tracker from the CLI.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for TrackerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TrackerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TrackerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(TrackerId)
    }
}

/// A recurring habit. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tracker {
    pub id: TrackerId,
    pub name: String,
    /// Palette key, e.g. `color-3`
    pub color: String,
    pub emoji: String,
    /// Weekday indices (0 = Monday). Empty means the tracker is never due.
    pub schedule: Vec<u8>,
}

impl Tracker {
    pub fn new(
        id: TrackerId,
        name: impl Into<String>,
        color: impl Into<String>,
        emoji: impl Into<String>,
        schedule: Vec<u8>,
    ) -> Self {
        Tracker {
            id,
            name: name.into(),
            color: color.into(),
            emoji: emoji.into(),
            schedule,
        }
    }

    /// Weekday names of the schedule, in schedule order. Out-of-range indices
    /// are dropped.
    pub fn scheduled_weekday_names(&self) -> Vec<&'static str> {
        self.scheduled_weekday_names_in(Language::En)
    }

    pub fn scheduled_weekday_names_in(&self, language: Language) -> Vec<&'static str> {
        let table = language.weekday_names();
        self.schedule
            .iter()
            .filter_map(|&i| table.get(i as usize).copied())
            .collect()
    }

    /// Whether the tracker recurs on the given weekday index.
    pub fn is_scheduled_on(&self, weekday: u8) -> bool {
        let Some(name) = WEEKDAY_NAMES.get(weekday as usize) else {
            return false;
        };
        self.scheduled_weekday_names().contains(name)
    }

    /// Days from `current_day` until the next scheduled weekday (0 when due
    /// today). `None` when nothing is scheduled.
    pub fn days_until_next_scheduled_day(&self, current_day: u8) -> Option<u8> {
        let current = current_day % DAYS_PER_WEEK;
        let valid = self.schedule.iter().copied().filter(|&d| d < DAYS_PER_WEEK);

        let next = valid
            .clone()
            .filter(|&d| d >= current)
            .min()
            .or_else(|| valid.min().map(|d| d + DAYS_PER_WEEK))?;

        let offset = next as i16 - current as i16;
        let offset = if offset < 0 { offset + DAYS_PER_WEEK as i16 } else { offset };
        Some(offset as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(schedule: Vec<u8>) -> Tracker {
        Tracker::new(TrackerId::new(), "Read", "color-1", "📚", schedule)
    }

    #[test]
    fn weekday_names_follow_schedule_order() {
        let t = tracker(vec![4, 0, 9, 2]);
        assert_eq!(t.scheduled_weekday_names(), vec!["Friday", "Monday", "Wednesday"]);
    }

    #[test]
    fn weekday_names_localized() {
        let t = tracker(vec![6]);
        assert_eq!(t.scheduled_weekday_names_in(Language::Ru), vec!["Воскресенье"]);
    }

    #[test]
    fn next_day_empty_schedule_is_never() {
        let t = tracker(vec![]);
        for d in 0..7 {
            assert_eq!(t.days_until_next_scheduled_day(d), None);
        }
    }

    #[test]
    fn next_day_zero_iff_scheduled() {
        let t = tracker(vec![0, 2, 4]);
        for d in 0..7 {
            let days = t.days_until_next_scheduled_day(d).unwrap();
            assert!(days <= 6);
            assert_eq!(days == 0, t.schedule.contains(&d), "day {}", d);
        }
    }

    #[test]
    fn next_day_wraps_to_lowest_entry() {
        let t = tracker(vec![1, 3]);
        assert_eq!(t.days_until_next_scheduled_day(0), Some(1));
        assert_eq!(t.days_until_next_scheduled_day(2), Some(1));
        assert_eq!(t.days_until_next_scheduled_day(4), Some(4));
        assert_eq!(t.days_until_next_scheduled_day(6), Some(2));
    }

    #[test]
    fn next_day_ignores_schedule_order() {
        let t = tracker(vec![5, 1]);
        assert_eq!(t.days_until_next_scheduled_day(0), Some(1));
        assert_eq!(t.days_until_next_scheduled_day(2), Some(3));
    }

    #[test]
    fn next_day_is_periodic() {
        let t = tracker(vec![2, 6]);
        for d in 0..7u8 {
            // Walking forward one day shortens the wait by one, until we land
            // on a scheduled day.
            let today = t.days_until_next_scheduled_day(d).unwrap();
            let tomorrow = t.days_until_next_scheduled_day((d + 1) % 7).unwrap();
            if today > 0 {
                assert_eq!(tomorrow, today - 1);
            }
            assert_eq!(
                t.days_until_next_scheduled_day(d),
                t.days_until_next_scheduled_day(d + 7)
            );
        }
    }

    #[test]
    fn next_day_only_invalid_entries_is_never() {
        let t = tracker(vec![7, 12]);
        assert_eq!(t.days_until_next_scheduled_day(3), None);
    }

    #[test]
    fn is_scheduled_on() {
        let t = tracker(vec![0, 2, 4]);
        assert!(t.is_scheduled_on(0));
        assert!(!t.is_scheduled_on(1));
        assert!(!t.is_scheduled_on(8));
    }

    #[test]
    fn tracker_id_round_trips_through_string() {
        let id = TrackerId::new();
        let parsed: TrackerId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert_eq!(id.short().len(), 8);
    }
}

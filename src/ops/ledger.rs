use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::record::{AsDay, TrackerRecord};
use crate::model::tracker::TrackerId;
use crate::model::weekday::Language;

/// Error type for ledger operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("tracker {id} is already completed on {date}")]
    DuplicateCompletion { id: TrackerId, date: NaiveDate },
}

/// Day-granularity completion records.
///
/// At most one record exists per (tracker, day). The ledger does not care
/// whether a date lies in the future; see [`is_completable`] for the policy
/// callers apply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionLedger {
    records: Vec<TrackerRecord>,
}

impl CompletionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from stored records, collapsing duplicate days.
    pub fn from_records(records: impl IntoIterator<Item = TrackerRecord>) -> Self {
        let mut ledger = Self::new();
        for record in records {
            let _ = ledger.mark_completed(record.record_id, record.date);
        }
        ledger
    }

    pub fn records(&self) -> &[TrackerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn mark_completed(&mut self, id: TrackerId, date: impl AsDay) -> Result<(), LedgerError> {
        let date = date.as_day();
        if self.is_completed(id, date) {
            return Err(LedgerError::DuplicateCompletion { id, date });
        }
        self.records.push(TrackerRecord::new(id, date));
        Ok(())
    }

    /// Remove the record for (id, day). Returns whether anything was removed;
    /// removing an absent record is not an error.
    pub fn unmark_completed(&mut self, id: TrackerId, date: impl AsDay) -> bool {
        let date = date.as_day();
        let before = self.records.len();
        self.records.retain(|r| !r.matches(id, date));
        self.records.len() != before
    }

    pub fn is_completed(&self, id: TrackerId, date: impl AsDay) -> bool {
        let date = date.as_day();
        self.records.iter().any(|r| r.matches(id, date))
    }

    /// Completed days for a tracker, across all dates.
    pub fn total_completions(&self, id: TrackerId) -> usize {
        self.records.iter().filter(|r| r.record_id == id).count()
    }

    /// Drop every record of a tracker. Returns how many were removed.
    pub fn remove_all(&mut self, id: TrackerId) -> usize {
        let before = self.records.len();
        self.records.retain(|r| r.record_id != id);
        before - self.records.len()
    }
}

/// Completion toggling is limited to today and earlier.
pub fn is_completable(date: impl AsDay, today: impl AsDay) -> bool {
    date.as_day() <= today.as_day()
}

/// Counter text shown under a tracker, e.g. `3 days`.
pub fn completion_label(count: usize, language: Language) -> String {
    match language {
        Language::En => {
            if count == 1 {
                "1 day".to_string()
            } else {
                format!("{} days", count)
            }
        }
        Language::Ru => {
            // 1 день, 2-4 дня, 5+ дней, with 11-14 always дней
            let teen = (count / 10) % 10 == 1;
            let suffix = match count % 10 {
                1 if !teen => "день",
                2..=4 if !teen => "дня",
                _ => "дней",
            };
            format!("{} {}", count, suffix)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn mark_then_is_completed() {
        let mut ledger = CompletionLedger::new();
        let id = TrackerId::new();
        ledger.mark_completed(id, day(3)).unwrap();
        assert!(ledger.is_completed(id, day(3)));
        assert!(!ledger.is_completed(id, day(4)));
    }

    #[test]
    fn mark_twice_is_duplicate() {
        let mut ledger = CompletionLedger::new();
        let id = TrackerId::new();
        ledger.mark_completed(id, day(3)).unwrap();
        let at_noon = day(3).and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap());
        assert_eq!(
            ledger.mark_completed(id, at_noon),
            Err(LedgerError::DuplicateCompletion { id, date: day(3) })
        );
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn unmark_removes_and_absent_is_noop() {
        let mut ledger = CompletionLedger::new();
        let id = TrackerId::new();
        ledger.mark_completed(id, day(3)).unwrap();
        assert!(ledger.unmark_completed(id, day(3)));
        assert!(!ledger.is_completed(id, day(3)));

        assert!(!ledger.unmark_completed(id, day(3)));
        assert_eq!(ledger.len(), 0);
    }

    #[test]
    fn unmark_only_touches_matching_tracker() {
        let mut ledger = CompletionLedger::new();
        let a = TrackerId::new();
        let b = TrackerId::new();
        ledger.mark_completed(a, day(1)).unwrap();
        ledger.mark_completed(b, day(1)).unwrap();
        ledger.unmark_completed(a, day(1));
        assert!(ledger.is_completed(b, day(1)));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn total_completions_counts_days() {
        let mut ledger = CompletionLedger::new();
        let a = TrackerId::new();
        let b = TrackerId::new();
        for d in 1..=4 {
            ledger.mark_completed(a, day(d)).unwrap();
        }
        ledger.mark_completed(b, day(1)).unwrap();
        assert_eq!(ledger.total_completions(a), 4);
        assert_eq!(ledger.total_completions(b), 1);
        assert_eq!(ledger.total_completions(TrackerId::new()), 0);
    }

    #[test]
    fn future_dates_are_allowed_by_ledger() {
        let mut ledger = CompletionLedger::new();
        let id = TrackerId::new();
        assert!(ledger.mark_completed(id, day(30)).is_ok());
        assert!(!is_completable(day(30), day(10)));
        assert!(is_completable(day(10), day(10)));
        assert!(is_completable(day(9), day(10)));
    }

    #[test]
    fn from_records_collapses_duplicates() {
        let id = TrackerId::new();
        let ledger = CompletionLedger::from_records(vec![
            TrackerRecord::new(id, day(1)),
            TrackerRecord::new(id, day(1)),
            TrackerRecord::new(id, day(2)),
        ]);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn remove_all_clears_tracker() {
        let mut ledger = CompletionLedger::new();
        let a = TrackerId::new();
        let b = TrackerId::new();
        ledger.mark_completed(a, day(1)).unwrap();
        ledger.mark_completed(a, day(2)).unwrap();
        ledger.mark_completed(b, day(2)).unwrap();
        assert_eq!(ledger.remove_all(a), 2);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn english_labels() {
        assert_eq!(completion_label(0, Language::En), "0 days");
        assert_eq!(completion_label(1, Language::En), "1 day");
        assert_eq!(completion_label(21, Language::En), "21 days");
    }

    #[test]
    fn russian_labels() {
        let cases = [
            (0, "0 дней"),
            (1, "1 день"),
            (2, "2 дня"),
            (4, "4 дня"),
            (5, "5 дней"),
            (11, "11 дней"),
            (12, "12 дней"),
            (14, "14 дней"),
            (21, "21 день"),
            (22, "22 дня"),
            (111, "111 дней"),
            (101, "101 день"),
        ];
        for (n, expected) in cases {
            assert_eq!(completion_label(n, Language::Ru), expected, "count {}", n);
        }
    }
}

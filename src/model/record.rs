use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

use super::tracker::TrackerId;

/// One day's completion of one tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackerRecord {
    /// Id of the completed tracker (shared by all of its records)
    pub record_id: TrackerId,
    pub date: NaiveDate,
}

impl TrackerRecord {
    pub fn new(record_id: TrackerId, date: impl AsDay) -> Self {
        TrackerRecord {
            record_id,
            date: date.as_day(),
        }
    }

    pub fn matches(&self, id: TrackerId, date: impl AsDay) -> bool {
        self.record_id == id && self.date == date.as_day()
    }
}

/// Anything that can be truncated to a calendar day.
pub trait AsDay {
    fn as_day(&self) -> NaiveDate;
}

impl AsDay for NaiveDate {
    fn as_day(&self) -> NaiveDate {
        *self
    }
}

impl AsDay for NaiveDateTime {
    fn as_day(&self) -> NaiveDate {
        self.date()
    }
}

/// Uses the local calendar day of the timestamp's own zone.
impl<Tz: TimeZone> AsDay for DateTime<Tz> {
    fn as_day(&self) -> NaiveDate {
        self.date_naive()
    }
}

impl<T: AsDay> AsDay for &T {
    fn as_day(&self) -> NaiveDate {
        (*self).as_day()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveTime};

    #[test]
    fn time_of_day_is_discarded() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let morning = day.and_time(NaiveTime::from_hms_opt(7, 15, 0).unwrap());
        let night = day.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap());
        let id = TrackerId::new();

        let record = TrackerRecord::new(id, morning);
        assert_eq!(record.date, day);
        assert!(record.matches(id, night));
        assert!(!record.matches(id, day.succ_opt().unwrap()));
        assert!(!record.matches(TrackerId::new(), day));
    }

    #[test]
    fn zoned_timestamp_uses_its_own_calendar_day() {
        let tz = FixedOffset::east_opt(3 * 3600).unwrap();
        let late = tz.with_ymd_and_hms(2024, 3, 10, 23, 30, 0).unwrap();
        assert_eq!(late.as_day(), NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    }
}

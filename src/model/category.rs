use serde::{Deserialize, Serialize};

use super::tracker::Tracker;

/// A titled group of trackers. Titles are unique across the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerCategory {
    pub title: String,
    /// Trackers in insertion order
    #[serde(default)]
    pub trackers: Vec<Tracker>,
}

impl TrackerCategory {
    pub fn new(title: impl Into<String>) -> Self {
        TrackerCategory {
            title: title.into(),
            trackers: Vec::new(),
        }
    }

    pub fn with_trackers(title: impl Into<String>, trackers: Vec<Tracker>) -> Self {
        TrackerCategory {
            title: title.into(),
            trackers,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }
}

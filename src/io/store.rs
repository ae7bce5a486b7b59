use indexmap::IndexMap;

use super::backend::{BackendError, DecodeError, StorageBackend, StoredDocument};
use crate::model::category::TrackerCategory;
use crate::model::record::AsDay;
use crate::model::tracker::{Tracker, TrackerId};
use crate::ops::diff::StoreUpdate;
use crate::ops::ledger::{CompletionLedger, LedgerError};
use crate::util::unicode::is_single_grapheme;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("corrupt store ({location}): {source}")]
    Decode {
        location: String,
        #[source]
        source: DecodeError,
    },
    #[error("category already exists: {0}")]
    DuplicateCategory(String),
    #[error("category not found: {0}")]
    CategoryNotFound(String),
    #[error("category title cannot be empty")]
    EmptyCategoryTitle,
    #[error("category {title:?} still has {count} tracker(s)")]
    CategoryNotEmpty { title: String, count: usize },
    #[error("tracker not found: {0}")]
    TrackerNotFound(TrackerId),
    #[error("tracker id already in use: {0}")]
    DuplicateTracker(TrackerId),
    #[error("invalid tracker: {0}")]
    InvalidTracker(String),
    #[error("invalid store data ({location}): {reason}")]
    Invalid { location: String, reason: String },
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Handle returned by [`TrackerRepository::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

/// Callback invoked after each mutation that changed category rows
pub type Listener = Box<dyn FnMut(&StoreUpdate)>;

/// Storage boundary for categories and trackers
pub trait TrackerRepository {
    /// All categories in display order, empty ones included.
    fn fetch_all_categories(&self) -> Vec<TrackerCategory>;
    /// True when no tracker is stored (categories may still exist).
    fn is_empty(&self) -> bool;
    fn create_tracker(&mut self, tracker: Tracker, category_title: &str) -> Result<(), StoreError>;
    fn create_category(&mut self, title: &str) -> Result<(), StoreError>;
    /// Delete an empty category. Non-empty categories are rejected.
    fn delete_category(&mut self, title: &str) -> Result<(), StoreError>;
    fn subscribe(&mut self, listener: Listener) -> ListenerId;
    fn unsubscribe(&mut self, id: ListenerId) -> bool;
}

/// Categories, trackers and completion records over a storage backend.
///
/// Every mutation is written through to the backend before listeners are
/// told about it. If the write fails the in-memory state is rolled back.
pub struct TrackerStore<B: StorageBackend> {
    backend: B,
    categories: IndexMap<String, Vec<Tracker>>,
    ledger: CompletionLedger,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: usize,
}

impl<B: StorageBackend> TrackerStore<B> {
    /// Load and decode the backend's document.
    pub fn open(backend: B) -> Result<Self, StoreError> {
        let doc = backend.load()?;
        let mut categories: IndexMap<String, Vec<Tracker>> = IndexMap::new();
        let mut seen_ids = std::collections::HashSet::new();

        for (ci, stored) in doc.categories.iter().enumerate() {
            let location = format!("category #{}", ci + 1);
            let title = stored.title.as_deref().ok_or_else(|| StoreError::Decode {
                location: location.clone(),
                source: DecodeError::MissingCategory,
            })?;
            let title = category_key(title).to_string();
            if title.is_empty() {
                return Err(StoreError::Invalid {
                    location,
                    reason: "category title cannot be empty".into(),
                });
            }
            if categories.contains_key(&title) {
                return Err(StoreError::DuplicateCategory(title));
            }
            let mut trackers = Vec::with_capacity(stored.trackers.len());
            for (ti, stored_tracker) in stored.trackers.iter().enumerate() {
                let location = format!("category {:?}, tracker #{}", title, ti + 1);
                let tracker = stored_tracker.decode().map_err(|e| StoreError::Decode {
                    location: location.clone(),
                    source: e,
                })?;
                check_tracker(&tracker).map_err(|reason| StoreError::Invalid { location, reason })?;
                if !seen_ids.insert(tracker.id) {
                    return Err(StoreError::DuplicateTracker(tracker.id));
                }
                trackers.push(tracker);
            }
            categories.insert(title, trackers);
        }

        let ledger = CompletionLedger::from_records(doc.records.iter().copied());
        let orphans = ledger
            .records()
            .iter()
            .filter(|r| !seen_ids.contains(&r.record_id))
            .count();
        if orphans > 0 {
            tracing::warn!(orphans, "completion records reference unknown trackers");
        }
        tracing::debug!(
            categories = categories.len(),
            records = ledger.len(),
            "store loaded"
        );

        Ok(TrackerStore {
            backend,
            categories,
            ledger,
            listeners: Vec::new(),
            next_listener: 0,
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn ledger(&self) -> &CompletionLedger {
        &self.ledger
    }

    pub fn category_titles(&self) -> Vec<&str> {
        self.categories.keys().map(|k| k.as_str()).collect()
    }

    /// Find a tracker and the title of its category.
    pub fn find_tracker(&self, id: TrackerId) -> Option<(&str, &Tracker)> {
        self.categories.iter().find_map(|(title, trackers)| {
            trackers
                .iter()
                .find(|t| t.id == id)
                .map(|t| (title.as_str(), t))
        })
    }

    /// Every tracker with its category title, in display order.
    pub fn trackers(&self) -> impl Iterator<Item = (&str, &Tracker)> {
        self.categories
            .iter()
            .flat_map(|(title, trackers)| trackers.iter().map(move |t| (title.as_str(), t)))
    }

    /// Delete a category together with its trackers and their completion
    /// records. Returns the number of trackers removed.
    pub fn delete_category_cascade(&mut self, title: &str) -> Result<usize, StoreError> {
        let title = category_key(title);
        let Some(trackers) = self.categories.get(title) else {
            return Err(StoreError::CategoryNotFound(title.to_string()));
        };
        let ids: Vec<TrackerId> = trackers.iter().map(|t| t.id).collect();
        self.mutate(|store| {
            store.categories.shift_remove(title);
            for id in &ids {
                store.ledger.remove_all(*id);
            }
            Ok(())
        })?;
        tracing::info!(title, trackers = ids.len(), "category deleted with trackers");
        Ok(ids.len())
    }

    pub fn mark_completed(&mut self, id: TrackerId, date: impl AsDay) -> Result<(), StoreError> {
        if self.find_tracker(id).is_none() {
            return Err(StoreError::TrackerNotFound(id));
        }
        let date = date.as_day();
        self.mutate(|store| Ok(store.ledger.mark_completed(id, date)?))?;
        tracing::info!(%id, %date, "completion recorded");
        Ok(())
    }

    /// Returns whether a record was removed.
    pub fn unmark_completed(&mut self, id: TrackerId, date: impl AsDay) -> Result<bool, StoreError> {
        let date = date.as_day();
        if !self.ledger.is_completed(id, date) {
            return Ok(false);
        }
        self.mutate(|store| Ok(store.ledger.unmark_completed(id, date)))?;
        tracing::info!(%id, %date, "completion removed");
        Ok(true)
    }

    /// Apply `f`, persist, and notify listeners. State is restored if either
    /// step fails.
    fn mutate<T, F>(&mut self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Self) -> Result<T, StoreError>,
    {
        let before_categories = self.categories.clone();
        let before_ledger = self.ledger.clone();

        let result = f(self).and_then(|value| {
            let doc = StoredDocument::encode(&self.categories, self.ledger.records());
            self.backend.save(&doc)?;
            Ok(value)
        });

        match result {
            Ok(value) => {
                let old = snapshot(&before_categories);
                let update = StoreUpdate::between(&old, &self.fetch_all_categories());
                if !update.is_empty() {
                    self.notify(&update);
                }
                Ok(value)
            }
            Err(e) => {
                self.categories = before_categories;
                self.ledger = before_ledger;
                Err(e)
            }
        }
    }

    fn notify(&mut self, update: &StoreUpdate) {
        tracing::debug!(listeners = self.listeners.len(), ?update, "notifying listeners");
        for (_, listener) in &mut self.listeners {
            listener(update);
        }
    }
}

fn snapshot(categories: &IndexMap<String, Vec<Tracker>>) -> Vec<TrackerCategory> {
    categories
        .iter()
        .map(|(title, trackers)| TrackerCategory::with_trackers(title.clone(), trackers.clone()))
        .collect()
}

/// Category titles are compared without surrounding whitespace.
fn category_key(title: &str) -> &str {
    title.trim()
}

fn check_tracker(tracker: &Tracker) -> Result<(), String> {
    if tracker.name.trim().is_empty() {
        return Err("name cannot be empty".into());
    }
    if tracker.color.trim().is_empty() {
        return Err("color cannot be empty".into());
    }
    if !is_single_grapheme(&tracker.emoji) {
        return Err(format!(
            "emoji must be a single character, got {:?}",
            tracker.emoji
        ));
    }
    Ok(())
}

fn validate(tracker: &Tracker) -> Result<(), StoreError> {
    check_tracker(tracker).map_err(StoreError::InvalidTracker)
}

impl<B: StorageBackend> TrackerRepository for TrackerStore<B> {
    fn fetch_all_categories(&self) -> Vec<TrackerCategory> {
        snapshot(&self.categories)
    }

    fn is_empty(&self) -> bool {
        self.categories.values().all(|trackers| trackers.is_empty())
    }

    fn create_tracker(&mut self, tracker: Tracker, category_title: &str) -> Result<(), StoreError> {
        validate(&tracker)?;
        let category_title = category_key(category_title);
        if !self.categories.contains_key(category_title) {
            return Err(StoreError::CategoryNotFound(category_title.to_string()));
        }
        if self.find_tracker(tracker.id).is_some() {
            return Err(StoreError::DuplicateTracker(tracker.id));
        }
        let id = tracker.id;
        self.mutate(|store| {
            if let Some(trackers) = store.categories.get_mut(category_title) {
                trackers.push(tracker);
            }
            Ok(())
        })?;
        tracing::info!(%id, category = category_title, "tracker created");
        Ok(())
    }

    fn create_category(&mut self, title: &str) -> Result<(), StoreError> {
        let title = category_key(title);
        if title.is_empty() {
            return Err(StoreError::EmptyCategoryTitle);
        }
        if self.categories.contains_key(title) {
            tracing::warn!(title, "category already exists");
            return Err(StoreError::DuplicateCategory(title.to_string()));
        }
        self.mutate(|store| {
            store.categories.insert(title.to_string(), Vec::new());
            Ok(())
        })?;
        tracing::info!(title, "category created");
        Ok(())
    }

    fn delete_category(&mut self, title: &str) -> Result<(), StoreError> {
        let title = category_key(title);
        let count = self
            .categories
            .get(title)
            .map(|trackers| trackers.len())
            .ok_or_else(|| StoreError::CategoryNotFound(title.to_string()))?;
        if count > 0 {
            tracing::warn!(title, count, "refusing to delete non-empty category");
            return Err(StoreError::CategoryNotEmpty {
                title: title.to_string(),
                count,
            });
        }
        self.mutate(|store| {
            store.categories.shift_remove(title);
            Ok(())
        })?;
        tracing::info!(title, "category deleted");
        Ok(())
    }

    fn subscribe(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, listener));
        id
    }

    fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }
}

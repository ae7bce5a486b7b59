use std::collections::{BTreeSet, HashMap, HashSet};
use std::hash::Hash;

use serde::Serialize;

use crate::model::category::TrackerCategory;

/// Result of comparing two ordered lists of keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDiff<T> {
    /// Present in new, absent in old (new order)
    pub inserts: Vec<T>,
    /// Present in old, absent in new (old order)
    pub deletes: Vec<T>,
    /// Present in both with a different first index (new order)
    pub reloads: Vec<T>,
}

impl<T> ListDiff<T> {
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.deletes.is_empty() && self.reloads.is_empty()
    }
}

/// Index of the first occurrence of every key.
fn first_indices<T: Eq + Hash>(items: &[T]) -> HashMap<&T, usize> {
    let mut map = HashMap::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        map.entry(item).or_insert(i);
    }
    map
}

/// Compare `old` against `new`. Keys are expected to be unique; a repeated
/// key is only tracked by its first occurrence.
pub fn diff<T: Eq + Hash + Clone>(old: &[T], new: &[T]) -> ListDiff<T> {
    let old_index = first_indices(old);
    let new_index = first_indices(new);

    let mut seen = HashSet::new();
    let deletes = old
        .iter()
        .filter(|item| !new_index.contains_key(item) && seen.insert(*item))
        .cloned()
        .collect();

    let mut inserts = Vec::new();
    let mut reloads = Vec::new();
    for (i, item) in new.iter().enumerate() {
        // Later occurrences of a repeated key are ignored
        if new_index.get(item) != Some(&i) {
            continue;
        }
        match old_index.get(item) {
            None => inserts.push(item.clone()),
            Some(&old_i) if old_i != i => reloads.push(item.clone()),
            Some(_) => {}
        }
    }

    ListDiff {
        inserts,
        deletes,
        reloads,
    }
}

/// A row that changed position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Move {
    pub old_index: usize,
    pub new_index: usize,
}

/// Row-level change set delivered to store listeners
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreUpdate {
    /// Row indices in the new snapshot
    pub inserted: BTreeSet<usize>,
    /// Row indices in the old snapshot
    pub deleted: BTreeSet<usize>,
    /// Rows at the same index whose content changed
    pub updated: BTreeSet<usize>,
    pub moved: BTreeSet<Move>,
}

impl StoreUpdate {
    /// Category rows keyed by title.
    pub fn between(old: &[TrackerCategory], new: &[TrackerCategory]) -> StoreUpdate {
        let old_titles: Vec<&str> = old.iter().map(|c| c.title.as_str()).collect();
        let new_titles: Vec<&str> = new.iter().map(|c| c.title.as_str()).collect();
        let old_index = first_indices(&old_titles);
        let new_index = first_indices(&new_titles);
        let changes = diff(&old_titles, &new_titles);

        let mut update = StoreUpdate::default();
        for title in &changes.deletes {
            update.deleted.insert(old_index[title]);
        }
        for title in &changes.inserts {
            update.inserted.insert(new_index[title]);
        }
        for title in &changes.reloads {
            update.moved.insert(Move {
                old_index: old_index[title],
                new_index: new_index[title],
            });
        }
        for (new_i, category) in new.iter().enumerate() {
            if let Some(&old_i) = old_index.get(&category.title.as_str())
                && old_i == new_i
                && old[old_i].trackers != category.trackers
            {
                update.updated.insert(new_i);
            }
        }
        update
    }

    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty()
            && self.deleted.is_empty()
            && self.updated.is_empty()
            && self.moved.is_empty()
    }
}

use chrono::NaiveDate;

use crate::model::category::TrackerCategory;
use crate::model::tracker::Tracker;
use crate::model::weekday::weekday_index;

/// Keep only trackers accepted by `keep`, dropping categories that end up
/// empty. Category and tracker order are preserved.
fn filter_categories<F>(categories: &[TrackerCategory], mut keep: F) -> Vec<TrackerCategory>
where
    F: FnMut(&Tracker) -> bool,
{
    categories
        .iter()
        .filter_map(|category| {
            let trackers: Vec<Tracker> = category
                .trackers
                .iter()
                .filter(|&t| keep(t))
                .cloned()
                .collect();
            if trackers.is_empty() {
                None
            } else {
                Some(TrackerCategory::with_trackers(category.title.clone(), trackers))
            }
        })
        .collect()
}

/// Trackers due on `date`. Trackers with an empty schedule are never due.
pub fn trackers_scheduled_on(categories: &[TrackerCategory], date: NaiveDate) -> Vec<TrackerCategory> {
    let weekday = weekday_index(date);
    filter_categories(categories, |t| t.is_scheduled_on(weekday))
}

/// Trackers whose name starts with `query`, ignoring case.
///
/// A blank query clears the search: every category is returned as-is.
/// Otherwise the query is matched as typed, surrounding spaces included.
pub fn trackers_matching_prefix(categories: &[TrackerCategory], query: &str) -> Vec<TrackerCategory> {
    if query.trim().is_empty() {
        return categories.to_vec();
    }
    let query = query.to_lowercase();
    filter_categories(categories, |t| t.name.to_lowercase().starts_with(&query))
}

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::category::TrackerCategory;
use crate::model::tracker::Tracker;
use crate::model::weekday::{Language, weekday_index};
use crate::ops::ledger::{CompletionLedger, completion_label};
use crate::util::unicode::pad_to_width;

const NAME_COLUMN: usize = 24;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TrackerJson {
    pub id: String,
    pub name: String,
    pub color: String,
    pub emoji: String,
    pub schedule: Vec<u8>,
    pub days: Vec<String>,
    pub total_completions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_due_in_days: Option<u8>,
}

#[derive(Serialize)]
pub struct TrackerWithCategoryJson {
    pub category: String,
    #[serde(flatten)]
    pub tracker: TrackerJson,
}

#[derive(Serialize)]
pub struct CategoryJson {
    pub title: String,
    pub trackers: Vec<TrackerJson>,
}

#[derive(Serialize)]
pub struct DayJson {
    pub date: NaiveDate,
    pub weekday: u8,
    pub categories: Vec<CategoryJson>,
}

#[derive(Serialize)]
pub struct CategorySummaryJson {
    pub title: String,
    pub trackers: usize,
}

/// Serialize with pretty-printing. Output structs contain no maps with
/// non-string keys, so this cannot fail.
pub fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// `on` adds the completion state and next-due offset relative to that day.
pub fn tracker_to_json(
    tracker: &Tracker,
    ledger: &CompletionLedger,
    language: Language,
    on: Option<NaiveDate>,
) -> TrackerJson {
    TrackerJson {
        id: tracker.id.to_string(),
        name: tracker.name.clone(),
        color: tracker.color.clone(),
        emoji: tracker.emoji.clone(),
        schedule: tracker.schedule.clone(),
        days: tracker
            .scheduled_weekday_names_in(language)
            .into_iter()
            .map(String::from)
            .collect(),
        total_completions: ledger.total_completions(tracker.id),
        completed: on.map(|date| ledger.is_completed(tracker.id, date)),
        next_due_in_days: on.and_then(|date| tracker.days_until_next_scheduled_day(weekday_index(date))),
    }
}

pub fn categories_to_json(
    categories: &[TrackerCategory],
    ledger: &CompletionLedger,
    language: Language,
    on: Option<NaiveDate>,
) -> Vec<CategoryJson> {
    categories
        .iter()
        .map(|c| CategoryJson {
            title: c.title.clone(),
            trackers: c
                .trackers
                .iter()
                .map(|t| tracker_to_json(t, ledger, language, on))
                .collect(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// One tracker row: checkbox (when a day is given), emoji, name, counter, id.
pub fn format_tracker_line(
    tracker: &Tracker,
    ledger: &CompletionLedger,
    language: Language,
    on: Option<NaiveDate>,
) -> String {
    let mut line = String::from("  ");
    if let Some(date) = on {
        let mark = if ledger.is_completed(tracker.id, date) { 'x' } else { ' ' };
        line.push_str(&format!("[{}] ", mark));
    }
    line.push_str(&tracker.emoji);
    line.push(' ');
    line.push_str(&pad_to_width(&tracker.name, NAME_COLUMN));
    line.push_str("  ");
    line.push_str(&pad_to_width(
        &completion_label(ledger.total_completions(tracker.id), language),
        10,
    ));
    line.push_str("  ");
    line.push_str(&tracker.id.short());
    line
}

/// Categories with their trackers, separated by blank lines.
pub fn format_categories(
    categories: &[TrackerCategory],
    ledger: &CompletionLedger,
    language: Language,
    on: Option<NaiveDate>,
) -> String {
    let mut blocks = Vec::new();
    for category in categories {
        let mut lines = vec![category.title.clone()];
        if category.is_empty() {
            lines.push("  (no trackers)".to_string());
        }
        for tracker in &category.trackers {
            lines.push(format_tracker_line(tracker, ledger, language, on));
        }
        blocks.push(lines.join("\n"));
    }
    blocks.join("\n\n")
}

/// Detail view for `hb show`.
pub fn format_tracker_details(
    tracker: &Tracker,
    category: &str,
    ledger: &CompletionLedger,
    language: Language,
    today: NaiveDate,
) -> String {
    let days = tracker.scheduled_weekday_names_in(language);
    let schedule = if days.is_empty() {
        "never".to_string()
    } else {
        days.join(", ")
    };
    let next = match tracker.days_until_next_scheduled_day(weekday_index(today)) {
        None => "never".to_string(),
        Some(0) => "today".to_string(),
        Some(1) => "tomorrow".to_string(),
        Some(n) => format!("in {} days", n),
    };
    let done_today = if ledger.is_completed(tracker.id, today) { "yes" } else { "no" };
    [
        format!("{} {}", tracker.emoji, tracker.name),
        format!("id:        {}", tracker.id),
        format!("category:  {}", category),
        format!("color:     {}", tracker.color),
        format!("schedule:  {}", schedule),
        format!("next due:  {}", next),
        format!("today:     {}", done_today),
        format!(
            "completed: {}",
            completion_label(ledger.total_completions(tracker.id), language)
        ),
    ]
    .join("\n")
}

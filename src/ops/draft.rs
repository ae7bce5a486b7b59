use std::fmt;

use crate::model::tracker::{Tracker, TrackerId};

/// Fields a draft must have before it can become a tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Id,
    Name,
    Color,
    Emoji,
    Schedule,
    Category,
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftField::Id => write!(f, "id"),
            DraftField::Name => write!(f, "name"),
            DraftField::Color => write!(f, "color"),
            DraftField::Emoji => write!(f, "emoji"),
            DraftField::Schedule => write!(f, "schedule"),
            DraftField::Category => write!(f, "category"),
        }
    }
}

/// A tracker under construction across several edit steps.
///
/// Setters overwrite unconditionally. Validation happens when the built
/// tracker is handed to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerDraft {
    id: Option<TrackerId>,
    name: Option<String>,
    color: Option<String>,
    emoji: Option<String>,
    schedule: Option<Vec<u8>>,
    category: Option<String>,
}

impl TrackerDraft {
    /// Start a draft with a freshly allocated id.
    pub fn new() -> Self {
        TrackerDraft {
            id: Some(TrackerId::new()),
            ..Default::default()
        }
    }

    /// Start a draft with no fields set.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn set_id(&mut self, id: TrackerId) -> &mut Self {
        self.id = Some(id);
        self
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    pub fn set_color(&mut self, color: impl Into<String>) -> &mut Self {
        self.color = Some(color.into());
        self
    }

    pub fn set_emoji(&mut self, emoji: impl Into<String>) -> &mut Self {
        self.emoji = Some(emoji.into());
        self
    }

    pub fn set_schedule(&mut self, schedule: Vec<u8>) -> &mut Self {
        self.schedule = Some(schedule);
        self
    }

    pub fn set_category(&mut self, category: impl Into<String>) -> &mut Self {
        self.category = Some(category.into());
        self
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Fields still unset, in declaration order.
    pub fn missing_fields(&self) -> Vec<DraftField> {
        let mut missing = Vec::new();
        if self.id.is_none() {
            missing.push(DraftField::Id);
        }
        if self.name.is_none() {
            missing.push(DraftField::Name);
        }
        if self.color.is_none() {
            missing.push(DraftField::Color);
        }
        if self.emoji.is_none() {
            missing.push(DraftField::Emoji);
        }
        if self.schedule.is_none() {
            missing.push(DraftField::Schedule);
        }
        if self.category.is_none() {
            missing.push(DraftField::Category);
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Materialize the tracker and its category title. Returns `None` while
    /// any field is unset; the draft itself is left untouched either way.
    pub fn build(&self) -> Option<(Tracker, String)> {
        let tracker = Tracker {
            id: self.id?,
            name: self.name.clone()?,
            color: self.color.clone()?,
            emoji: self.emoji.clone()?,
            schedule: self.schedule.clone()?,
        };
        Some((tracker, self.category.clone()?))
    }

    /// Discard everything entered so far.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::model::record::TrackerRecord;
use crate::model::tracker::{Tracker, TrackerId};

const DOCUMENT_VERSION: u32 = 1;

/// A required tracker field that was absent from storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("missing tracker id")]
    MissingId,
    #[error("missing tracker name")]
    MissingName,
    #[error("missing tracker color")]
    MissingColor,
    #[error("missing tracker emoji")]
    MissingEmoji,
    #[error("missing tracker schedule")]
    MissingSchedule,
    #[error("missing category title")]
    MissingCategory,
}

/// Error type for storage backends
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not serialize store: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// Tracker as persisted. Every field is optional so a damaged document still
/// loads far enough to report which field is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTracker {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TrackerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<u8>>,
}

impl StoredTracker {
    pub fn decode(&self) -> Result<Tracker, DecodeError> {
        Ok(Tracker {
            id: self.id.ok_or(DecodeError::MissingId)?,
            name: self.name.clone().ok_or(DecodeError::MissingName)?,
            color: self.color.clone().ok_or(DecodeError::MissingColor)?,
            emoji: self.emoji.clone().ok_or(DecodeError::MissingEmoji)?,
            schedule: self.schedule.clone().ok_or(DecodeError::MissingSchedule)?,
        })
    }
}

impl From<&Tracker> for StoredTracker {
    fn from(tracker: &Tracker) -> Self {
        StoredTracker {
            id: Some(tracker.id),
            name: Some(tracker.name.clone()),
            color: Some(tracker.color.clone()),
            emoji: Some(tracker.emoji.clone()),
            schedule: Some(tracker.schedule.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCategory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub trackers: Vec<StoredTracker>,
}

/// The whole persisted state: categories with their trackers, plus the
/// completion records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDocument {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub categories: Vec<StoredCategory>,
    #[serde(default)]
    pub records: Vec<TrackerRecord>,
}

fn default_version() -> u32 {
    DOCUMENT_VERSION
}

impl Default for StoredDocument {
    fn default() -> Self {
        StoredDocument {
            version: DOCUMENT_VERSION,
            categories: Vec::new(),
            records: Vec::new(),
        }
    }
}

impl StoredDocument {
    pub fn encode(categories: &IndexMap<String, Vec<Tracker>>, records: &[TrackerRecord]) -> Self {
        StoredDocument {
            version: DOCUMENT_VERSION,
            categories: categories
                .iter()
                .map(|(title, trackers)| StoredCategory {
                    title: Some(title.clone()),
                    trackers: trackers.iter().map(StoredTracker::from).collect(),
                })
                .collect(),
            records: records.to_vec(),
        }
    }
}

/// Where the store document lives
pub trait StorageBackend {
    fn load(&self) -> Result<StoredDocument, BackendError>;
    fn save(&mut self, doc: &StoredDocument) -> Result<(), BackendError>;
}

/// Keeps the document in memory. Used for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    doc: StoredDocument,
    /// Number of successful saves
    pub saves: usize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(doc: StoredDocument) -> Self {
        MemoryBackend { doc, saves: 0 }
    }

    pub fn document(&self) -> &StoredDocument {
        &self.doc
    }
}

impl StorageBackend for MemoryBackend {
    fn load(&self) -> Result<StoredDocument, BackendError> {
        Ok(self.doc.clone())
    }

    fn save(&mut self, doc: &StoredDocument) -> Result<(), BackendError> {
        self.doc = doc.clone();
        self.saves += 1;
        Ok(())
    }
}

/// A pretty-printed JSON document on disk. A missing file loads as an empty
/// store.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileBackend { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for JsonFileBackend {
    fn load(&self) -> Result<StoredDocument, BackendError> {
        if !self.path.exists() {
            return Ok(StoredDocument::default());
        }
        let text = fs::read_to_string(&self.path).map_err(|e| BackendError::ReadError {
            path: self.path.clone(),
            source: e,
        })?;
        serde_json::from_str(&text).map_err(|e| BackendError::ParseError {
            path: self.path.clone(),
            source: e,
        })
    }

    fn save(&mut self, doc: &StoredDocument) -> Result<(), BackendError> {
        let mut content = serde_json::to_string_pretty(doc)?;
        content.push('\n');
        atomic_write(&self.path, content.as_bytes()).map_err(|e| BackendError::WriteError {
            path: self.path.clone(),
            source: e,
        })
    }
}

/// Write through a temp file in the same directory, then rename over the
/// target.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
